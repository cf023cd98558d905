diesel::table! {
    draws (id) {
        id -> Integer,
        round -> Integer,
        numbers -> Nullable<Text>,
        bonus_number -> Nullable<Integer>,
        draw_date -> Date,
    }
}

diesel::table! {
    tickets (id) {
        id -> Integer,
        round -> Nullable<Integer>,
        numbers -> Text,
        purchase_date -> Timestamp,
        is_auto -> Bool,
        access_code -> Text,
    }
}

diesel::table! {
    winning_results (id) {
        id -> Integer,
        ticket_id -> Integer,
        rank -> Integer,
        matched_numbers -> Integer,
    }
}

diesel::joinable!(winning_results -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(draws, tickets, winning_results);
