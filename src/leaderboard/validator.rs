//! Plausibility checks for client-reported scores.
//!
//! The client is untrusted: scores arrive as bare numbers, so the only
//! defense is arithmetic. Every rule is derived from the simulation's
//! own constants. Checks run in a fixed order and the first failure
//! wins, which keeps rejection reasons stable for the audit log.

use crate::config::{
    INITIAL_SNAKE_LENGTH, MAX_THEORETICAL_SCORE, MIN_MS_PER_FOOD, POINTS_PER_FOOD,
    SNAKE_LENGTH_TOLERANCE, TIMESTAMP_FRESHNESS_MS,
};
use crate::error::RejectReason;
use crate::game::Difficulty;

use super::entry::ScoreSubmission;

/// Decide whether a submission describes a game the engine could have
/// produced. `now_ms` is the server clock, unix milliseconds.
pub fn validate(submission: &ScoreSubmission, now_ms: i64) -> Result<(), RejectReason> {
    let points_per_food = i64::from(POINTS_PER_FOOD);

    if submission.score < 0 {
        return Err(RejectReason::NegativeScore);
    }
    if submission.score % points_per_food != 0 {
        return Err(RejectReason::NotPointMultiple);
    }
    if submission.score > MAX_THEORETICAL_SCORE {
        return Err(RejectReason::ExceedsMaximum);
    }
    if submission.timestamp.saturating_sub(now_ms).saturating_abs() > TIMESTAMP_FRESHNESS_MS {
        return Err(RejectReason::StaleTimestamp);
    }
    if Difficulty::from_str(&submission.difficulty).is_none() {
        return Err(RejectReason::UnknownDifficulty);
    }

    let foods_eaten = submission.score / points_per_food;

    // Each food adds one segment, so length is pinned to the score up to
    // a small tolerance for client-side display quirks.
    let expected_length = INITIAL_SNAKE_LENGTH as i64 + foods_eaten;
    let deviation = submission.snake_length.saturating_sub(expected_length).saturating_abs();
    if deviation > SNAKE_LENGTH_TOLERANCE {
        return Err(RejectReason::ImplausibleLength);
    }

    // The snake needs time to reach each food; a run faster than the
    // per-food floor cannot be legitimate.
    let min_duration = foods_eaten * MIN_MS_PER_FOOD;
    if submission.game_time < min_duration {
        return Err(RejectReason::ImplausibleDuration);
    }

    Ok(())
}
