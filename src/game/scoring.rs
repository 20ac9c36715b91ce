//! Pure score computation for a finished session.

use crate::game::problems::Difficulty;

/// Base score awarded per correct answer for a tier.
pub fn base_score(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 100,
        Difficulty::Medium => 200,
        Difficulty::Hard => 300,
    }
}

/// Time bonus: the tier base score reduced by half the elapsed seconds,
/// floored at zero.
pub fn time_bonus(difficulty: Difficulty, total_time_seconds: u64) -> u32 {
    let base = base_score(difficulty);
    let decay = (total_time_seconds / 2).min(u64::from(base)) as u32;
    base - decay
}

/// Final session score: `correct_count * base + time_bonus`. Deterministic,
/// no bounds check on `correct_count` beyond what the caller guarantees.
pub fn score(difficulty: Difficulty, correct_count: u32, total_time_seconds: u64) -> u32 {
    correct_count * base_score(difficulty) + time_bonus(difficulty, total_time_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easy_full_board_fast_run() {
        assert_eq!(score(Difficulty::Easy, 10, 40), 1_080);
    }

    #[test]
    fn medium_partial_board() {
        assert_eq!(score(Difficulty::Medium, 7, 130), 1_535);
    }

    #[test]
    fn hard_no_correct_answers_still_earns_the_bonus() {
        assert_eq!(score(Difficulty::Hard, 0, 10), 295);
    }

    #[test]
    fn bonus_floors_at_zero_on_slow_runs() {
        assert_eq!(time_bonus(Difficulty::Easy, 300), 0);
        assert_eq!(score(Difficulty::Easy, 10, 300), 1_000);
    }

    #[test]
    fn bonus_equals_base_at_the_starting_gun() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(time_bonus(difficulty, 0), base_score(difficulty));
            assert_eq!(time_bonus(difficulty, 1), base_score(difficulty));
        }
    }
}
