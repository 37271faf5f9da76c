//! Read path for the leaderboard.
//!
//! Queries vastly outnumber submissions, so reads go through a
//! short-lived cache that shields the store from per-request traffic.

use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::QUERY_CACHE_TTL_MS;
use crate::error::StoreError;

use super::entry::LeaderboardSnapshot;
use super::store::LeaderboardStore;

struct CachedBoard {
    snapshot: LeaderboardSnapshot,
    fetched_at: Instant,
}

/// Cached view over the persisted leaderboard.
pub struct QueryService {
    store: LeaderboardStore,
    cache: RwLock<Option<CachedBoard>>,
    ttl: Duration,
}

impl QueryService {
    pub fn new(store: LeaderboardStore) -> Self {
        Self::with_ttl(store, Duration::from_millis(QUERY_CACHE_TTL_MS))
    }

    pub fn with_ttl(store: LeaderboardStore, ttl: Duration) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
            ttl,
        }
    }

    /// Current ranked board, served from cache while fresh.
    pub async fn top_scores(&self) -> Result<LeaderboardSnapshot, StoreError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return Ok(cached.snapshot.clone());
                }
            }
        }

        let snapshot = self.store.load().await?;
        let mut cache = self.cache.write().await;
        *cache = Some(CachedBoard {
            snapshot: snapshot.clone(),
            fetched_at: Instant::now(),
        });
        Ok(snapshot)
    }

    /// Drop the cached board so the next query reads through. Called
    /// after an accepted submission so the submitter sees their rank.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
