//! Per-source admission control for score submissions

use std::net::IpAddr;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::config::{RATE_LIMIT_MAX_SUBMISSIONS, RATE_LIMIT_WINDOW_MS};

#[derive(Debug, Clone, Copy)]
struct SourceWindow {
    window_start: Instant,
    count: u32,
}

/// Fixed-window submission counter keyed by source address.
///
/// The first submission from a source opens a window. Once the count
/// reaches the cap, further submissions from that source are denied
/// until the window elapses and a fresh one opens. Windows for distinct
/// sources are fully independent.
#[derive(Debug)]
pub struct SubmissionRateLimiter {
    sources: DashMap<IpAddr, SourceWindow>,
    max_submissions: u32,
    window: Duration,
}

impl SubmissionRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(
            RATE_LIMIT_MAX_SUBMISSIONS,
            Duration::from_millis(RATE_LIMIT_WINDOW_MS),
        )
    }

    pub fn with_limits(max_submissions: u32, window: Duration) -> Self {
        Self {
            sources: DashMap::new(),
            max_submissions,
            window,
        }
    }

    /// Count one submission attempt against `source`. Returns whether the
    /// attempt is admitted. Denied attempts do not extend the window.
    pub fn check_allowed(&self, source: IpAddr) -> bool {
        let now = Instant::now();
        let mut window = self.sources.entry(source).or_insert(SourceWindow {
            window_start: now,
            count: 0,
        });

        if now.duration_since(window.window_start) >= self.window {
            window.window_start = now;
            window.count = 0;
        }

        if window.count < self.max_submissions {
            window.count += 1;
            true
        } else {
            false
        }
    }

    /// Drop windows that have already expired. Called periodically so the
    /// map does not accumulate one entry per source forever.
    pub fn prune_expired(&self) {
        let now = Instant::now();
        self.sources
            .retain(|_, window| now.duration_since(window.window_start) < self.window);
    }

    pub fn tracked_sources(&self) -> usize {
        self.sources.len()
    }
}

impl Default for SubmissionRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
