//! Error taxonomy for the submission and query paths

use thiserror::Error;

/// Internal reason a submission failed plausibility validation.
///
/// Reasons are logged server-side only; clients receive a generic
/// rejection message so the heuristics stay non-obvious.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Score is below zero
    NegativeScore,
    /// Score is not a multiple of the per-food point value
    NotPointMultiple,
    /// Score exceeds what the grid can physically hold
    ExceedsMaximum,
    /// Submission timestamp too far from server time, either direction
    StaleTimestamp,
    /// Declared difficulty is not a configured tier
    UnknownDifficulty,
    /// Snake length inconsistent with the score
    ImplausibleLength,
    /// Game finished faster than food could be eaten
    ImplausibleDuration,
}

impl RejectReason {
    /// Stable code used in audit logs and diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::NegativeScore => "negative_score",
            RejectReason::NotPointMultiple => "not_point_multiple",
            RejectReason::ExceedsMaximum => "exceeds_maximum",
            RejectReason::StaleTimestamp => "stale_timestamp",
            RejectReason::UnknownDifficulty => "unknown_difficulty",
            RejectReason::ImplausibleLength => "implausible_length",
            RejectReason::ImplausibleDuration => "implausible_duration",
        }
    }
}

/// Errors surfaced by the key/value blob store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transient failure; retried with backoff before escalating
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Conditional write lost a race with a concurrent writer
    #[error("store version conflict")]
    VersionConflict,

    /// Stored record could not be decoded
    #[error("stored record corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Outcome of a score submission that did not reach the leaderboard.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Denied by per-source admission control; never retried automatically
    #[error("submission rate limit exceeded")]
    AdmissionDenied,

    /// One of the plausibility checks failed
    #[error("submission rejected: {}", .0.code())]
    ValidationRejected(RejectReason),

    /// Store retries exhausted
    #[error("leaderboard store failure: {0}")]
    Store(#[from] StoreError),
}
