#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod errors;
mod store;

use std::env;

use actix::prelude::{Addr, SyncArbiter};
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::MigrationHarness;

use lotto_site_lottery::game::numbers;

use errors::LotteryError;
use store::db::{
    CreateDraw, CreateTicket, DbExecutor, EvaluateDraw, ExecuteDraw, FindDraw, FindTicket,
    ListTickets,
};
use store::models;

struct WebState {
    db: Addr<DbExecutor>,
}

impl ResponseError for LotteryError {
    fn status_code(&self) -> StatusCode {
        match *self {
            LotteryError::TicketNotFound | LotteryError::DrawNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            LotteryError::InvalidNumbers { .. } => StatusCode::BAD_REQUEST,
            LotteryError::AlreadyDrawn { .. } | LotteryError::DrawNotReady { .. } => {
                StatusCode::CONFLICT
            }
            LotteryError::CorruptedDraw { .. } | LotteryError::UnexpectedError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(format!("{}", self))
    }
}

fn unexpected<E: Into<failure::Error>>(error: E) -> LotteryError {
    LotteryError::UnexpectedError { cause: error.into() }
}

fn session_error<E: std::fmt::Display>(error: E) -> LotteryError {
    LotteryError::UnexpectedError { cause: failure::err_msg(error.to_string()) }
}

const SESSION_TICKETS_KEY: &str = "tickets";

fn owned_tickets(session: &Session) -> Result<Vec<i32>, LotteryError> {
    session
        .get::<Vec<i32>>(SESSION_TICKETS_KEY)
        .map(|ids| ids.unwrap_or_default())
        .map_err(session_error)
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum BuyTicket {
    Manual { numbers: String },
    Auto,
}

#[derive(Serialize)]
struct BoughtTicket {
    ticket: models::Ticket,
    check_url: String,
}

async fn buy_ticket(
    state: web::Data<WebState>,
    session: Session,
    body: web::Json<BuyTicket>,
) -> Result<HttpResponse, LotteryError> {
    let (picked, auto) = match body.into_inner() {
        BuyTicket::Manual { numbers: raw } => {
            let picked = numbers::parse(&raw)
                .map_err(|error| LotteryError::InvalidNumbers { cause: error.into() })?;
            (picked, false)
        }
        BuyTicket::Auto => (numbers::generate(), true),
    };

    let ticket = state
        .db
        .send(CreateTicket { numbers: numbers::format(&picked), is_auto: auto })
        .await
        .map_err(unexpected)??;

    // anonymous purchase, the session remembers which tickets are ours
    let mut owned = owned_tickets(&session)?;
    owned.push(ticket.id);
    session
        .insert(SESSION_TICKETS_KEY, &owned)
        .map_err(session_error)?;

    let check_url = format!("/tickets/{}/{}", ticket.id, ticket.access_code);
    Ok(HttpResponse::Created().json(BoughtTicket { ticket, check_url }))
}

async fn my_tickets(
    state: web::Data<WebState>,
    session: Session,
) -> Result<HttpResponse, LotteryError> {
    let owned = owned_tickets(&session)?;
    let recaps = state
        .db
        .send(ListTickets { ids: owned })
        .await
        .map_err(unexpected)??;
    Ok(HttpResponse::Ok().json(recaps))
}

// the access code stays an opaque string, a malformed one is just a failed
// lookup and answers 404 like any other mismatch
async fn check_ticket(
    state: web::Data<WebState>,
    path: web::Path<(i32, String)>,
) -> Result<HttpResponse, LotteryError> {
    let (id, access_code) = path.into_inner();
    let recap = state
        .db
        .send(FindTicket { id, access_code })
        .await
        .map_err(unexpected)??;
    Ok(HttpResponse::Ok().json(recap))
}

async fn create_draw(state: web::Data<WebState>) -> Result<HttpResponse, LotteryError> {
    let draw = state.db.send(CreateDraw).await.map_err(unexpected)??;
    Ok(HttpResponse::Created().json(draw))
}

async fn get_draw(
    state: web::Data<WebState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, LotteryError> {
    let recap = state
        .db
        .send(FindDraw { round: path.into_inner() })
        .await
        .map_err(unexpected)??;
    Ok(HttpResponse::Ok().json(recap))
}

async fn execute_draw(
    state: web::Data<WebState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, LotteryError> {
    let draw = state
        .db
        .send(ExecuteDraw { round: path.into_inner() })
        .await
        .map_err(unexpected)??;
    Ok(HttpResponse::Ok().json(draw))
}

async fn evaluate_draw(
    state: web::Data<WebState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, LotteryError> {
    let summary = state
        .db
        .send(EvaluateDraw { round: path.into_inner() })
        .await
        .map_err(unexpected)??;
    Ok(HttpResponse::Ok().json(summary))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL is mandatory");
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8088".to_owned());
    // SESSION_SECRET must be at least 64 bytes, fresh random key otherwise
    let session_key = env::var("SESSION_SECRET")
        .map(|secret| Key::from(secret.as_bytes()))
        .unwrap_or_else(|_| Key::generate());

    let mut conn = SqliteConnection::establish(&database_url).expect("Failed to open database");
    conn.run_pending_migrations(store::MIGRATIONS)
        .expect("Failed to run db migrations");
    drop(conn);

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .build(manager)
        .expect("Failed to create db pool");

    let addr = SyncArbiter::start(3, move || DbExecutor(pool.clone()));

    info!("Starting lottery on {}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(WebState { db: addr.clone() }))
            .wrap(middleware::Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .route("/tickets", web::post().to(buy_ticket))
            .route("/tickets", web::get().to(my_tickets))
            .route("/tickets/{id}/{access_code}", web::get().to(check_ticket))
            .route("/draws", web::post().to(create_draw))
            .route("/draws/{round}", web::get().to(get_draw))
            .route("/draws/{round}/execute", web::post().to(execute_draw))
            .route("/draws/{round}/evaluate", web::post().to(evaluate_draw))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
