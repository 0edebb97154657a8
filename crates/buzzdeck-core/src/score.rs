//! Point and rating arithmetic for the reveal quiz.
//!
//! Pure functions; the single persisted rating integer is owned by the
//! store, not by anything here.

/// Points for a correct answer with nothing revealed.
pub const MAX_POINTS: i32 = 100;

/// Fraction of the maximum forfeited at full reveal.
pub const REVEAL_PENALTY: f64 = 0.85;

/// Points for a wrong answer after buzzing.
pub const WRONG_ANSWER_POINTS: i32 = -20;

/// Points when the question countdown expires without a buzz.
pub const TIMEOUT_POINTS: i32 = -10;

/// Rating delta for a correct answer.
pub const RATING_CORRECT_DELTA: i32 = 25;

/// Rating delta for an incorrect answer.
pub const RATING_INCORRECT_DELTA: i32 = -15;

/// Rating delta for a timeout.
pub const RATING_TIMEOUT_DELTA: i32 = -10;

/// Ratings never drop below this floor.
pub const RATING_FLOOR: i32 = 800;

/// Rating assigned to a player with no history.
pub const DEFAULT_RATING: i32 = 1000;

/// Points for a correct answer given how much of the question was revealed
/// at the moment of buzzing. Earlier buzzes earn more; the floor is 15 at
/// full reveal, the cap 100 at zero reveal.
pub fn points_for_correct(revealed_tokens: usize, total_tokens: usize) -> i32 {
    if total_tokens == 0 {
        return MAX_POINTS;
    }
    let fraction = revealed_tokens as f64 / total_tokens as f64;
    (MAX_POINTS as f64 * (1.0 - REVEAL_PENALTY * fraction)).round() as i32
}

/// Apply a rating delta, clamping at the floor.
pub fn apply_rating_delta(rating: i32, delta: i32) -> i32 {
    (rating + delta).max(RATING_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_at_boundaries() {
        assert_eq!(points_for_correct(0, 10), 100);
        assert_eq!(points_for_correct(10, 10), 15);
    }

    #[test]
    fn points_scenario_two_of_five_revealed() {
        // revealed fraction 0.4 -> round(100 * (1 - 0.85 * 0.4)) = 66
        assert_eq!(points_for_correct(2, 5), 66);
    }

    #[test]
    fn points_monotonically_non_increasing() {
        let total = 23;
        let mut last = i32::MAX;
        for revealed in 0..=total {
            let points = points_for_correct(revealed, total);
            assert!(points <= last, "revealed {revealed} earned more than less-revealed buzz");
            assert!((15..=100).contains(&points));
            last = points;
        }
    }

    #[test]
    fn rating_clamps_at_floor() {
        assert_eq!(apply_rating_delta(1000, 25), 1025);
        assert_eq!(apply_rating_delta(1000, -15), 985);
        assert_eq!(apply_rating_delta(805, -15), 800);
        // Idempotent under repeated clamping.
        assert_eq!(apply_rating_delta(800, -15), 800);
        assert_eq!(apply_rating_delta(800, -10), 800);
    }
}
