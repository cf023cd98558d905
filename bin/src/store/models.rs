use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use super::schema::{draws, tickets, winning_results};

#[derive(Serialize, Queryable, Debug, Clone)]
pub struct Draw {
    pub id: i32,
    pub round: i32,
    pub numbers: Option<String>,
    pub bonus_number: Option<i32>,
    pub draw_date: NaiveDate,
}

#[derive(Insertable)]
#[diesel(table_name = draws)]
pub struct NewDraw {
    pub round: i32,
    pub draw_date: NaiveDate,
}

#[derive(Serialize, Queryable, Debug, Clone)]
pub struct Ticket {
    pub id: i32,
    pub round: Option<i32>,
    pub numbers: String,
    pub purchase_date: NaiveDateTime,
    pub is_auto: bool,
    pub access_code: String,
}

#[derive(Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicket<'a> {
    pub numbers: &'a str,
    pub purchase_date: NaiveDateTime,
    pub is_auto: bool,
    pub access_code: &'a str,
}

#[derive(Serialize, Queryable, Debug, Clone)]
pub struct WinningResult {
    pub id: i32,
    pub ticket_id: i32,
    pub rank: i32,
    pub matched_numbers: i32,
}

#[derive(Insertable)]
#[diesel(table_name = winning_results)]
pub struct NewWinningResult {
    pub ticket_id: i32,
    pub rank: i32,
    pub matched_numbers: i32,
}

/// A ticket together with its winning result, if it ranked.
#[derive(Serialize, Debug)]
pub struct TicketRecap {
    pub ticket: Ticket,
    pub result: Option<WinningResult>,
}

/// A draw together with the number of tickets assigned to its round.
#[derive(Serialize, Debug)]
pub struct DrawRecap {
    pub draw: Draw,
    pub ticket_count: i64,
}

/// What one evaluation run did.
#[derive(Serialize, Debug, PartialEq)]
pub struct EvaluationSummary {
    pub round: i32,
    pub evaluated: usize,
    pub winners: usize,
    pub skipped: usize,
}
