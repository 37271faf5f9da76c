//! Shared application state handed to every request handler

use std::sync::Arc;

use tracing::warn;

use crate::config::{ENABLE_EVENT_LOGGING, EVENT_LOG_FILE};
use crate::event_logger::EventLogger;
use crate::leaderboard::{
    KvStore, LeaderboardStore, MemoryKvStore, QueryService, SubmissionRateLimiter,
    SubmissionService,
};

/// Handles to the two leaderboard services. Cloning is cheap; all
/// clones share the same store, cache, and rate limiter.
#[derive(Clone)]
pub struct AppState {
    pub submission: Arc<SubmissionService>,
    pub query: Arc<QueryService>,
}

impl AppState {
    /// Production wiring: in-process store plus the configured audit log.
    pub fn new() -> Self {
        let event_log = if ENABLE_EVENT_LOGGING {
            match EventLogger::new(EVENT_LOG_FILE) {
                Ok(logger) => Some(Arc::new(logger)),
                Err(err) => {
                    warn!(%err, path = EVENT_LOG_FILE, "audit log disabled, cannot open file");
                    None
                }
            }
        } else {
            None
        };
        Self::assemble(Arc::new(MemoryKvStore::new()), event_log)
    }

    /// Wire the services over a caller-provided store, without an audit log.
    pub fn with_store(kv: Arc<dyn KvStore>) -> Self {
        Self::assemble(kv, None)
    }

    fn assemble(kv: Arc<dyn KvStore>, event_log: Option<Arc<EventLogger>>) -> Self {
        let store = LeaderboardStore::new(kv);
        let mut submission = SubmissionService::new(store.clone(), SubmissionRateLimiter::new());
        if let Some(log) = event_log {
            submission = submission.with_event_log(log);
        }
        Self {
            submission: Arc::new(submission),
            query: Arc::new(QueryService::new(store)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
