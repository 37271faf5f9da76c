//! Score submission pipeline: admission control, validation, ranked write.
//!
//! Order matters here. The rate limiter runs first so hostile sources
//! burn their budget before any work happens; validation runs second so
//! only plausible games ever touch the store; the read-modify-write
//! cycle runs last and retries when a concurrent submitter wins the
//! conditional write.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::RMW_MAX_RETRIES;
use crate::error::{StoreError, SubmitError};
use crate::event_logger::{EventLogger, SubmissionEvent};

use super::entry::{LeaderboardEntry, ScoreSubmission};
use super::rate_limiter::SubmissionRateLimiter;
use super::store::LeaderboardStore;
use super::validator;

/// What an accepted submission achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// 1-based board position, or `None` when the score was valid but
    /// too low to place.
    pub rank: Option<u32>,
}

/// Coordinates one submission's full path onto the leaderboard.
pub struct SubmissionService {
    store: LeaderboardStore,
    rate_limiter: SubmissionRateLimiter,
    event_log: Option<Arc<EventLogger>>,
}

impl SubmissionService {
    pub fn new(store: LeaderboardStore, rate_limiter: SubmissionRateLimiter) -> Self {
        Self {
            store,
            rate_limiter,
            event_log: None,
        }
    }

    pub fn with_event_log(mut self, event_log: Arc<EventLogger>) -> Self {
        self.event_log = Some(event_log);
        self
    }

    pub fn rate_limiter(&self) -> &SubmissionRateLimiter {
        &self.rate_limiter
    }

    fn audit(&self, event: SubmissionEvent) {
        if let Some(log) = &self.event_log {
            log.log(event);
        }
    }

    /// Submit a score for ranking.
    ///
    /// Returns the achieved rank on acceptance. Every failure mode keeps
    /// its precise reason internal; callers translate [`SubmitError`]
    /// into the deliberately vague wire responses.
    pub async fn submit(
        &self,
        source: IpAddr,
        submission: ScoreSubmission,
    ) -> Result<SubmitOutcome, SubmitError> {
        if !self.rate_limiter.check_allowed(source) {
            warn!(%source, "submission throttled");
            self.audit(SubmissionEvent::SubmissionThrottled {
                source: source.to_string(),
            });
            return Err(SubmitError::AdmissionDenied);
        }

        let now_ms = super::unix_time_ms();
        if let Err(reason) = validator::validate(&submission, now_ms) {
            info!(%source, score = submission.score, reason = reason.code(), "submission rejected");
            self.audit(SubmissionEvent::SubmissionRejected {
                source: source.to_string(),
                score: submission.score,
                reason: reason.code(),
            });
            return Err(SubmitError::ValidationRejected(reason));
        }

        let entry = LeaderboardEntry::from_submission(&submission);
        let mut attempt = 0u32;
        loop {
            let mut board = match self.store.load().await {
                Ok(board) => board,
                Err(err) => {
                    warn!(%source, %err, "leaderboard read failed");
                    self.audit(SubmissionEvent::StoreFailure {
                        context: "load",
                        error: err.to_string(),
                    });
                    return Err(err.into());
                }
            };

            let rank = board.insert_ranked(entry.clone());
            board.last_updated = now_ms as u64;

            match self.store.save(&board).await {
                Ok(_) => {
                    info!(%source, score = submission.score, ?rank, "score accepted");
                    self.audit(SubmissionEvent::SubmissionAccepted {
                        source: source.to_string(),
                        score: submission.score,
                        difficulty: submission.difficulty.clone(),
                        rank,
                    });
                    return Ok(SubmitOutcome { rank });
                }
                Err(StoreError::VersionConflict) => {
                    attempt += 1;
                    if attempt >= RMW_MAX_RETRIES {
                        warn!(%source, attempt, "leaderboard write kept conflicting, giving up");
                        self.audit(SubmissionEvent::StoreFailure {
                            context: "save",
                            error: StoreError::VersionConflict.to_string(),
                        });
                        return Err(SubmitError::Store(StoreError::VersionConflict));
                    }
                    debug!(%source, attempt, "leaderboard write conflicted, re-reading");
                }
                Err(err) => {
                    warn!(%source, %err, "leaderboard write failed");
                    self.audit(SubmissionEvent::StoreFailure {
                        context: "save",
                        error: err.to_string(),
                    });
                    return Err(err.into());
                }
            }
        }
    }
}
