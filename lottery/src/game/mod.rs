pub mod errors;

pub mod numbers;
pub mod ranking;

/// Smallest pickable lotto number.
pub const MIN_NUMBER: u8 = 1;
/// Largest pickable lotto number.
pub const MAX_NUMBER: u8 = 45;
/// How many numbers a ticket or a winning set holds.
pub const PICK_COUNT: usize = 6;
