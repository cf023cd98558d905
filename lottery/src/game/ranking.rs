/// Prize tier of a winning ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl Rank {
    pub fn as_i32(self) -> i32 {
        match self {
            Rank::First => 1,
            Rank::Second => 2,
            Rank::Third => 3,
            Rank::Fourth => 4,
            Rank::Fifth => 5,
        }
    }
}

/// Outcome of matching one ticket against a winning set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub matched: usize,
    pub bonus_matched: bool,
    pub rank: Option<Rank>,
}

/// Match a ticket against the winning numbers and bonus number.
///
/// 6 matches is rank 1, 5 matches plus the bonus is rank 2, 5 matches is
/// rank 3, 4 matches is rank 4, 3 matches is rank 5, anything below is
/// unranked. Both slices are expected to be valid sets from
/// `numbers::parse`.
pub fn evaluate(ticket: &[u8], winning: &[u8], bonus: u8) -> Evaluation {
    let matched = ticket.iter().filter(|n| winning.contains(n)).count();
    let bonus_matched = ticket.contains(&bonus);
    let rank = match (matched, bonus_matched) {
        (6, _) => Some(Rank::First),
        (5, true) => Some(Rank::Second),
        (5, false) => Some(Rank::Third),
        (4, _) => Some(Rank::Fourth),
        (3, _) => Some(Rank::Fifth),
        _ => None,
    };
    Evaluation { matched, bonus_matched, rank }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINNING: [u8; 6] = [1, 2, 3, 4, 5, 6];
    const BONUS: u8 = 7;

    #[test]
    fn test_six_matches_is_first_rank() {
        let actual = evaluate(&[1, 2, 3, 4, 5, 6], &WINNING, BONUS);
        assert_eq!(actual.matched, 6);
        assert_eq!(actual.rank, Some(Rank::First));
    }

    #[test]
    fn test_five_matches_with_bonus_is_second_rank() {
        let actual = evaluate(&[1, 2, 3, 4, 5, 7], &WINNING, BONUS);
        assert_eq!(actual.matched, 5);
        assert!(actual.bonus_matched);
        assert_eq!(actual.rank, Some(Rank::Second));
    }

    #[test]
    fn test_five_matches_without_bonus_is_third_rank() {
        let actual = evaluate(&[1, 2, 3, 4, 5, 45], &WINNING, BONUS);
        assert_eq!(actual.matched, 5);
        assert!(!actual.bonus_matched);
        assert_eq!(actual.rank, Some(Rank::Third));
    }

    #[test]
    fn test_four_matches_is_fourth_rank() {
        let actual = evaluate(&[1, 2, 3, 4, 44, 45], &WINNING, BONUS);
        assert_eq!(actual.rank, Some(Rank::Fourth));

        // the bonus number does not help below 5 matches
        let actual = evaluate(&[1, 2, 3, 4, 7, 45], &WINNING, BONUS);
        assert_eq!(actual.rank, Some(Rank::Fourth));
    }

    #[test]
    fn test_three_matches_is_fifth_rank() {
        let actual = evaluate(&[1, 2, 3, 43, 44, 45], &WINNING, BONUS);
        assert_eq!(actual.rank, Some(Rank::Fifth));
    }

    #[test]
    fn test_two_or_less_matches_is_unranked() {
        let actual = evaluate(&[1, 2, 42, 43, 44, 45], &WINNING, BONUS);
        assert_eq!(actual.matched, 2);
        assert_eq!(actual.rank, None);

        let actual = evaluate(&[40, 41, 42, 43, 44, 45], &WINNING, BONUS);
        assert_eq!(actual.matched, 0);
        assert_eq!(actual.rank, None);

        // bonus alone never ranks
        let actual = evaluate(&[7, 41, 42, 43, 44, 45], &WINNING, BONUS);
        assert!(actual.bonus_matched);
        assert_eq!(actual.rank, None);
    }

    #[test]
    fn test_rank_as_i32() {
        assert_eq!(Rank::First.as_i32(), 1);
        assert_eq!(Rank::Second.as_i32(), 2);
        assert_eq!(Rank::Third.as_i32(), 3);
        assert_eq!(Rank::Fourth.as_i32(), 4);
        assert_eq!(Rank::Fifth.as_i32(), 5);
    }
}
