use rand::seq::SliceRandom;
use rand::Rng;

use super::errors::NumbersError;
use super::{MAX_NUMBER, MIN_NUMBER, PICK_COUNT};

fn shuffled_pool<R: Rng>(rng: &mut R) -> Vec<u8> {
    let mut pool: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER).collect();
    pool.shuffle(rng);
    pool
}

/// Generate 6 unique lotto numbers in ascending order.
pub fn generate() -> Vec<u8> {
    let mut picked = shuffled_pool(&mut rand::thread_rng())[..PICK_COUNT].to_vec();
    picked.sort_unstable();
    picked
}

/// Generate a winning set plus a bonus number guaranteed not to be part of it.
pub fn generate_with_bonus() -> (Vec<u8>, u8) {
    let pool = shuffled_pool(&mut rand::thread_rng());
    let mut winning = pool[..PICK_COUNT].to_vec();
    winning.sort_unstable();
    (winning, pool[PICK_COUNT])
}

/// Parse a comma separated number string (eg. "1,5,10,16,27,42") into a sorted set.
///
/// Surrounding whitespace on each entry is tolerated. The set must hold exactly
/// 6 unique numbers in the 1..=45 range.
pub fn parse(raw: &str) -> Result<Vec<u8>, NumbersError> {
    let mut numbers = raw
        .split(',')
        .map(|part| {
            let trimmed = part.trim();
            trimmed
                .parse::<u8>()
                .map_err(|_| NumbersError::NotANumber { value: trimmed.to_string() })
        })
        .collect::<Result<Vec<u8>, NumbersError>>()?;
    if numbers.len() != PICK_COUNT {
        return Err(NumbersError::WrongCount { count: numbers.len() });
    }
    if let Some(&number) = numbers.iter().find(|n| **n < MIN_NUMBER || **n > MAX_NUMBER) {
        return Err(NumbersError::OutOfRange { number });
    }
    numbers.sort_unstable();
    if let Some(pair) = numbers.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(NumbersError::Duplicate { number: pair[0] });
    }
    Ok(numbers)
}

/// Canonical comma separated rendering of a number set.
pub fn format(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<String>>()
        .join(",")
}
