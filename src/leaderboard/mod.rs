//! Global score ranking: validation, admission control, persistence, queries

pub mod entry;
pub mod query;
pub mod rate_limiter;
pub mod store;
pub mod submission;
pub mod validator;

pub use entry::{LeaderboardEntry, LeaderboardSnapshot, ScoreSubmission};
pub use query::QueryService;
pub use rate_limiter::SubmissionRateLimiter;
pub use store::{KvStore, LeaderboardStore, MemoryKvStore, VersionedValue};
pub use submission::{SubmissionService, SubmitOutcome};

/// Server wall clock, unix milliseconds.
pub fn unix_time_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
