//! Versioned key/value persistence for the leaderboard.
//!
//! The board lives under a single key as a JSON blob. Writes are
//! conditional on the version observed at read time, so concurrent
//! submitters cannot silently overwrite each other; the loser of a race
//! gets [`StoreError::VersionConflict`] and re-reads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::sleep;
use tracing::warn;

use crate::config::{LEADERBOARD_KEY, STORE_RETRY_ATTEMPTS, STORE_RETRY_BASE_DELAY_MS};
use crate::error::StoreError;

use super::entry::LeaderboardSnapshot;

/// A stored blob together with its version counter.
#[derive(Debug, Clone)]
pub struct VersionedValue {
    pub data: Vec<u8>,
    pub version: u64,
}

/// Minimal versioned blob store.
///
/// `put` succeeds only when `expected_version` matches the key's current
/// version; `0` means the key must not exist yet. The new version is
/// returned on success.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError>;

    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        expected_version: u64,
    ) -> Result<u64, StoreError>;
}

/// In-process store backed by a concurrent map. The default backend, and
/// the reference semantics any external backend has to match.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, VersionedValue>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        // The entry guard holds the shard lock, making compare-and-set atomic
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().version != expected_version {
                    return Err(StoreError::VersionConflict);
                }
                let next = expected_version + 1;
                occupied.insert(VersionedValue {
                    data: value,
                    version: next,
                });
                Ok(next)
            }
            Entry::Vacant(vacant) => {
                if expected_version != 0 {
                    return Err(StoreError::VersionConflict);
                }
                vacant.insert(VersionedValue {
                    data: value,
                    version: 1,
                });
                Ok(1)
            }
        }
    }
}

/// Leaderboard persistence over any [`KvStore`].
///
/// Transient `Unavailable` errors are retried with linear backoff.
/// `VersionConflict` is surfaced immediately: retrying a conditional
/// write without re-reading cannot succeed, so that loop belongs to the
/// submission service.
#[derive(Clone)]
pub struct LeaderboardStore {
    kv: Arc<dyn KvStore>,
}

impl LeaderboardStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Fetch the current board. A missing key is an empty board, not an
    /// error; the first save will create it.
    pub async fn load(&self) -> Result<LeaderboardSnapshot, StoreError> {
        let mut attempt = 0u32;
        loop {
            match self.kv.get(LEADERBOARD_KEY).await {
                Ok(Some(value)) => {
                    let mut snapshot: LeaderboardSnapshot = serde_json::from_slice(&value.data)?;
                    snapshot.store_version = value.version;
                    return Ok(snapshot);
                }
                Ok(None) => return Ok(LeaderboardSnapshot::empty()),
                Err(StoreError::Unavailable(reason)) => {
                    attempt += 1;
                    if attempt >= STORE_RETRY_ATTEMPTS {
                        return Err(StoreError::Unavailable(reason));
                    }
                    let delay = Duration::from_millis(STORE_RETRY_BASE_DELAY_MS * u64::from(attempt));
                    warn!(attempt, delay_ms = delay.as_millis() as u64, %reason, "leaderboard load failed, retrying");
                    sleep(delay).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Write the board conditionally on `snapshot.store_version`.
    /// Returns the version assigned by the store.
    pub async fn save(&self, snapshot: &LeaderboardSnapshot) -> Result<u64, StoreError> {
        let payload = serde_json::to_vec(snapshot)?;
        let mut attempt = 0u32;
        loop {
            match self
                .kv
                .put(LEADERBOARD_KEY, payload.clone(), snapshot.store_version)
                .await
            {
                Ok(version) => return Ok(version),
                Err(StoreError::Unavailable(reason)) => {
                    attempt += 1;
                    if attempt >= STORE_RETRY_ATTEMPTS {
                        return Err(StoreError::Unavailable(reason));
                    }
                    let delay = Duration::from_millis(STORE_RETRY_BASE_DELAY_MS * u64::from(attempt));
                    warn!(attempt, delay_ms = delay.as_millis() as u64, %reason, "leaderboard save failed, retrying");
                    sleep(delay).await;
                }
                Err(other) => return Err(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::entry::LeaderboardEntry;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Store wrapper that fails a set number of calls before recovering.
    struct FlakyStore {
        inner: MemoryKvStore,
        fail_gets: AtomicU32,
        fail_puts: AtomicU32,
        get_calls: AtomicU32,
        put_calls: AtomicU32,
    }

    impl FlakyStore {
        fn new(fail_gets: u32, fail_puts: u32) -> Self {
            Self {
                inner: MemoryKvStore::new(),
                fail_gets: AtomicU32::new(fail_gets),
                fail_puts: AtomicU32::new(fail_puts),
                get_calls: AtomicU32::new(0),
                put_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl KvStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_gets.load(Ordering::SeqCst) > 0 {
                self.fail_gets.fetch_sub(1, Ordering::SeqCst);
                return Err(StoreError::Unavailable("injected outage".to_string()));
            }
            self.inner.get(key).await
        }

        async fn put(
            &self,
            key: &str,
            value: Vec<u8>,
            expected_version: u64,
        ) -> Result<u64, StoreError> {
            self.put_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_puts.load(Ordering::SeqCst) > 0 {
                self.fail_puts.fetch_sub(1, Ordering::SeqCst);
                return Err(StoreError::Unavailable("injected outage".to_string()));
            }
            self.inner.put(key, value, expected_version).await
        }
    }

    fn sample_entry(score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            id: format!("entry-{score}"),
            score,
            difficulty: "EASY".to_string(),
            snake_length: 3 + score / 10,
            game_time: 10_000,
            timestamp: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_memory_store_versions_are_sequential() {
        let store = MemoryKvStore::new();

        assert_eq!(store.put("k", b"a".to_vec(), 0).await.unwrap(), 1);
        assert_eq!(store.put("k", b"b".to_vec(), 1).await.unwrap(), 2);
        assert_eq!(store.put("k", b"c".to_vec(), 2).await.unwrap(), 3);

        let value = store.get("k").await.unwrap().unwrap();
        assert_eq!(value.data, b"c".to_vec());
        assert_eq!(value.version, 3);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_mismatched_versions() {
        let store = MemoryKvStore::new();
        store.put("k", b"a".to_vec(), 0).await.unwrap();

        // Stale version loses
        assert!(matches!(
            store.put("k", b"b".to_vec(), 0).await,
            Err(StoreError::VersionConflict)
        ));
        // Creating over a missing key with a nonzero version loses too
        assert!(matches!(
            store.put("other", b"b".to_vec(), 5).await,
            Err(StoreError::VersionConflict)
        ));
        // The stored value is untouched
        let value = store.get("k").await.unwrap().unwrap();
        assert_eq!(value.data, b"a".to_vec());
        assert_eq!(value.version, 1);
    }

    #[tokio::test]
    async fn test_missing_board_loads_empty() {
        let store = LeaderboardStore::new(Arc::new(MemoryKvStore::new()));
        let board = store.load().await.unwrap();
        assert!(board.scores.is_empty());
        assert_eq!(board.store_version, 0);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_with_store_version() {
        let store = LeaderboardStore::new(Arc::new(MemoryKvStore::new()));

        let mut board = LeaderboardSnapshot::empty();
        board.insert_ranked(sample_entry(120));
        board.last_updated = 42;

        assert_eq!(store.save(&board).await.unwrap(), 1);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.store_version, 1);
        assert_eq!(loaded.last_updated, 42);
        assert_eq!(loaded.scores, board.scores);
    }

    #[tokio::test]
    async fn test_stale_snapshot_save_conflicts() {
        let store = LeaderboardStore::new(Arc::new(MemoryKvStore::new()));

        let mut first = store.load().await.unwrap();
        first.insert_ranked(sample_entry(100));
        store.save(&first).await.unwrap();

        // Second writer still holds version 0
        let mut stale = LeaderboardSnapshot::empty();
        stale.insert_ranked(sample_entry(200));
        assert!(matches!(
            store.save(&stale).await,
            Err(StoreError::VersionConflict)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_retries_through_transient_outage() {
        let flaky = Arc::new(FlakyStore::new(2, 0));
        let store = LeaderboardStore::new(flaky.clone());

        let board = store.load().await.unwrap();
        assert!(board.scores.is_empty());
        assert_eq!(flaky.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_gives_up_after_retry_budget() {
        let flaky = Arc::new(FlakyStore::new(10, 0));
        let store = LeaderboardStore::new(flaky.clone());

        assert!(matches!(
            store.load().await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(
            flaky.get_calls.load(Ordering::SeqCst),
            STORE_RETRY_ATTEMPTS
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_version_conflict_is_not_retried() {
        let flaky = Arc::new(FlakyStore::new(0, 0));
        flaky.inner.put("leaderboard", b"{}".to_vec(), 0).await.unwrap();
        let store = LeaderboardStore::new(flaky.clone());

        let stale = LeaderboardSnapshot::empty();
        assert!(matches!(
            store.save(&stale).await,
            Err(StoreError::VersionConflict)
        ));
        assert_eq!(flaky.put_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_reported() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.put("leaderboard", b"not json".to_vec(), 0).await.unwrap();

        let store = LeaderboardStore::new(kv);
        assert!(matches!(store.load().await, Err(StoreError::Corrupt(_))));
    }
}
