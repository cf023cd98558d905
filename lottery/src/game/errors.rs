#[derive(Debug, Fail, PartialEq)]
pub enum NumbersError {
    #[fail(display = "'{}' is not a valid lotto number", value)]
    NotANumber { value: String },
    #[fail(display = "number {} is out of the 1..=45 range", number)]
    OutOfRange { number: u8 },
    #[fail(display = "number {} appears more than once", number)]
    Duplicate { number: u8 },
    #[fail(display = "expected 6 numbers, got {}", count)]
    WrongCount { count: usize },
}
