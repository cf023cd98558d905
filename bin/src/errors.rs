use failure::Error;

#[derive(Fail, Debug)]
pub enum LotteryError {
    #[fail(display = "Ticket not found")]
    TicketNotFound,
    #[fail(display = "Draw {} not found", round)]
    DrawNotFound { round: i32 },
    #[fail(display = "Invalid ticket numbers")]
    InvalidNumbers { cause: Error },
    #[fail(display = "Draw {} has already been drawn", round)]
    AlreadyDrawn { round: i32 },
    #[fail(display = "Draw {} has no winning numbers yet", round)]
    DrawNotReady { round: i32 },
    #[fail(display = "Draw {} holds malformed winning numbers", round)]
    CorruptedDraw { round: i32, cause: Error },
    #[fail(display = "Unexpected error")]
    UnexpectedError { cause: Error },
}

impl From<diesel::result::Error> for LotteryError {
    fn from(error: diesel::result::Error) -> Self {
        LotteryError::UnexpectedError { cause: error.into() }
    }
}
