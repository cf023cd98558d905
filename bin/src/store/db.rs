//! Db executor actor
use std::convert::TryFrom;

use actix::prelude::*;
use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use uuid::Uuid;

use lotto_site_lottery::game::{numbers, ranking};

use super::models;
use super::schema::{draws, tickets, winning_results};
use crate::errors::LotteryError;

/// This is db executor actor. We are going to run 3 of them in parallel.
pub struct DbExecutor(pub Pool<ConnectionManager<SqliteConnection>>);

impl Actor for DbExecutor {
    type Context = SyncContext<Self>;
}

impl DbExecutor {
    fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, LotteryError> {
        self.0
            .get()
            .map_err(|error| LotteryError::UnexpectedError { cause: error.into() })
    }
}

pub struct CreateTicket {
    pub numbers: String,
    pub is_auto: bool,
}

impl Message for CreateTicket {
    type Result = Result<models::Ticket, LotteryError>;
}

impl Handler<CreateTicket> for DbExecutor {
    type Result = Result<models::Ticket, LotteryError>;

    fn handle(&mut self, msg: CreateTicket, _: &mut Self::Context) -> Self::Result {
        let mut conn = self.conn()?;
        create_ticket(&mut conn, &msg.numbers, msg.is_auto)
    }
}

pub struct FindTicket {
    pub id: i32,
    pub access_code: String,
}

impl Message for FindTicket {
    type Result = Result<models::TicketRecap, LotteryError>;
}

impl Handler<FindTicket> for DbExecutor {
    type Result = Result<models::TicketRecap, LotteryError>;

    fn handle(&mut self, msg: FindTicket, _: &mut Self::Context) -> Self::Result {
        let mut conn = self.conn()?;
        find_ticket(&mut conn, msg.id, &msg.access_code)
    }
}

pub struct ListTickets {
    pub ids: Vec<i32>,
}

impl Message for ListTickets {
    type Result = Result<Vec<models::TicketRecap>, LotteryError>;
}

impl Handler<ListTickets> for DbExecutor {
    type Result = Result<Vec<models::TicketRecap>, LotteryError>;

    fn handle(&mut self, msg: ListTickets, _: &mut Self::Context) -> Self::Result {
        let mut conn = self.conn()?;
        list_tickets(&mut conn, &msg.ids)
    }
}

pub struct CreateDraw;

impl Message for CreateDraw {
    type Result = Result<models::Draw, LotteryError>;
}

impl Handler<CreateDraw> for DbExecutor {
    type Result = Result<models::Draw, LotteryError>;

    fn handle(&mut self, _: CreateDraw, _: &mut Self::Context) -> Self::Result {
        let mut conn = self.conn()?;
        create_draw(&mut conn)
    }
}

pub struct ExecuteDraw {
    pub round: i32,
}

impl Message for ExecuteDraw {
    type Result = Result<models::Draw, LotteryError>;
}

impl Handler<ExecuteDraw> for DbExecutor {
    type Result = Result<models::Draw, LotteryError>;

    fn handle(&mut self, msg: ExecuteDraw, _: &mut Self::Context) -> Self::Result {
        let (winning, bonus) = numbers::generate_with_bonus();
        let mut conn = self.conn()?;
        execute_draw(&mut conn, msg.round, &winning, bonus)
    }
}

pub struct EvaluateDraw {
    pub round: i32,
}

impl Message for EvaluateDraw {
    type Result = Result<models::EvaluationSummary, LotteryError>;
}

impl Handler<EvaluateDraw> for DbExecutor {
    type Result = Result<models::EvaluationSummary, LotteryError>;

    fn handle(&mut self, msg: EvaluateDraw, _: &mut Self::Context) -> Self::Result {
        let mut conn = self.conn()?;
        evaluate_draw(&mut conn, msg.round)
    }
}

pub struct FindDraw {
    pub round: i32,
}

impl Message for FindDraw {
    type Result = Result<models::DrawRecap, LotteryError>;
}

impl Handler<FindDraw> for DbExecutor {
    type Result = Result<models::DrawRecap, LotteryError>;

    fn handle(&mut self, msg: FindDraw, _: &mut Self::Context) -> Self::Result {
        let mut conn = self.conn()?;
        find_draw(&mut conn, msg.round)
    }
}

pub fn create_ticket(
    conn: &mut SqliteConnection,
    raw_numbers: &str,
    auto: bool,
) -> Result<models::Ticket, LotteryError> {
    let code = Uuid::new_v4().to_string();
    let new_ticket = models::NewTicket {
        numbers: raw_numbers,
        purchase_date: Utc::now().naive_utc(),
        is_auto: auto,
        access_code: &code,
    };
    diesel::insert_into(tickets::table)
        .values(&new_ticket)
        .execute(conn)?;
    Ok(tickets::table
        .filter(tickets::access_code.eq(&code))
        .first(conn)?)
}

/// Anonymous ticket lookup. A wrong access code is indistinguishable from a
/// missing ticket.
pub fn find_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i32,
    code: &str,
) -> Result<models::TicketRecap, LotteryError> {
    let ticket = tickets::table
        .filter(tickets::id.eq(ticket_id).and(tickets::access_code.eq(code)))
        .first::<models::Ticket>(conn)
        .optional()?
        .ok_or(LotteryError::TicketNotFound)?;
    let result = winning_results::table
        .filter(winning_results::ticket_id.eq(ticket.id))
        .first::<models::WinningResult>(conn)
        .optional()?;
    Ok(models::TicketRecap { ticket, result })
}

pub fn list_tickets(
    conn: &mut SqliteConnection,
    ids: &[i32],
) -> Result<Vec<models::TicketRecap>, LotteryError> {
    let rows = tickets::table
        .left_join(winning_results::table)
        .filter(tickets::id.eq_any(ids))
        .order(tickets::id.asc())
        .load::<(models::Ticket, Option<models::WinningResult>)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(ticket, result)| models::TicketRecap { ticket, result })
        .collect())
}

pub fn create_draw(conn: &mut SqliteConnection) -> Result<models::Draw, LotteryError> {
    let last_round: Option<i32> = draws::table.select(max(draws::round)).first(conn)?;
    let new_round = last_round.unwrap_or(0) + 1;
    let new_draw = models::NewDraw {
        round: new_round,
        draw_date: Utc::now().date_naive(),
    };
    diesel::insert_into(draws::table)
        .values(&new_draw)
        .execute(conn)?;
    Ok(draws::table
        .filter(draws::round.eq(new_round))
        .first(conn)?)
}

/// Store the winning numbers of a round. A round that already holds numbers
/// is never overwritten.
pub fn execute_draw(
    conn: &mut SqliteConnection,
    round: i32,
    winning: &[u8],
    bonus: u8,
) -> Result<models::Draw, LotteryError> {
    conn.transaction(|conn| {
        let draw = draws::table
            .filter(draws::round.eq(round))
            .first::<models::Draw>(conn)
            .optional()?
            .ok_or(LotteryError::DrawNotFound { round })?;
        if draw.numbers.is_some() {
            warn!("Draw {} has already been drawn", round);
            return Err(LotteryError::AlreadyDrawn { round });
        }
        diesel::update(draws::table.find(draw.id))
            .set((
                draws::numbers.eq(numbers::format(winning)),
                draws::bonus_number.eq(i32::from(bonus)),
            ))
            .execute(conn)?;
        info!("Draw {} executed : numbers {}, bonus {}", round, numbers::format(winning), bonus);
        Ok(draws::table.find(draw.id).first(conn)?)
    })
}

/// Match every ticket without a round against the draw, assign the round and
/// persist the results of ranked tickets. Tickets holding malformed numbers
/// are skipped and stay unassigned.
pub fn evaluate_draw(
    conn: &mut SqliteConnection,
    round: i32,
) -> Result<models::EvaluationSummary, LotteryError> {
    conn.transaction(|conn| {
        let draw = draws::table
            .filter(draws::round.eq(round))
            .first::<models::Draw>(conn)
            .optional()?
            .ok_or(LotteryError::DrawNotFound { round })?;
        let raw_numbers = draw
            .numbers
            .as_deref()
            .ok_or(LotteryError::DrawNotReady { round })?;
        let winning = numbers::parse(raw_numbers)
            .map_err(|error| LotteryError::CorruptedDraw { round, cause: error.into() })?;
        let bonus = draw
            .bonus_number
            .ok_or(LotteryError::DrawNotReady { round })
            .and_then(|stored| {
                u8::try_from(stored)
                    .map_err(|error| LotteryError::CorruptedDraw { round, cause: error.into() })
            })?;

        let pending = tickets::table
            .filter(tickets::round.is_null())
            .load::<models::Ticket>(conn)?;

        let mut summary = models::EvaluationSummary { round, evaluated: 0, winners: 0, skipped: 0 };
        for ticket in pending {
            let picked = match numbers::parse(&ticket.numbers) {
                Ok(picked) => picked,
                Err(error) => {
                    warn!("Skipping ticket {} with malformed numbers : {}", ticket.id, error);
                    summary.skipped += 1;
                    continue;
                }
            };
            diesel::update(tickets::table.find(ticket.id))
                .set(tickets::round.eq(draw.round))
                .execute(conn)?;
            summary.evaluated += 1;

            let evaluation = ranking::evaluate(&picked, &winning, bonus);
            if let Some(rank) = evaluation.rank {
                upsert_result(conn, ticket.id, rank.as_i32(), evaluation.matched as i32)?;
                summary.winners += 1;
            }
        }
        info!(
            "Draw {} evaluated : {} tickets, {} winners, {} skipped",
            round, summary.evaluated, summary.winners, summary.skipped
        );
        Ok(summary)
    })
}

fn upsert_result(
    conn: &mut SqliteConnection,
    ticket: i32,
    rank: i32,
    matched: i32,
) -> Result<(), LotteryError> {
    let existing = winning_results::table
        .filter(winning_results::ticket_id.eq(ticket))
        .first::<models::WinningResult>(conn)
        .optional()?;
    match existing {
        Some(result) => {
            diesel::update(winning_results::table.find(result.id))
                .set((
                    winning_results::rank.eq(rank),
                    winning_results::matched_numbers.eq(matched),
                ))
                .execute(conn)?;
        }
        None => {
            diesel::insert_into(winning_results::table)
                .values(&models::NewWinningResult { ticket_id: ticket, rank, matched_numbers: matched })
                .execute(conn)?;
        }
    }
    Ok(())
}

pub fn find_draw(conn: &mut SqliteConnection, round: i32) -> Result<models::DrawRecap, LotteryError> {
    let draw = draws::table
        .filter(draws::round.eq(round))
        .first::<models::Draw>(conn)
        .optional()?
        .ok_or(LotteryError::DrawNotFound { round })?;
    let ticket_count: i64 = tickets::table
        .filter(tickets::round.eq(draw.round))
        .count()
        .get_result(conn)?;
    Ok(models::DrawRecap { draw, ticket_count })
}
