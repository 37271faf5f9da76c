//! Leaderboard data model: submissions, ranked entries, snapshots

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LEADERBOARD_CAP;

/// A client-reported game result, exactly as it arrived on the wire.
///
/// Fields are kept wide and unvalidated; the validator decides whether
/// the numbers describe a playable game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: i64,
    /// Client wall clock at game over, unix milliseconds.
    pub timestamp: i64,
    pub difficulty: String,
    pub snake_length: i64,
    pub game_time: i64,
}

/// One accepted score on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub score: u32,
    pub difficulty: String,
    pub snake_length: u32,
    pub game_time: u64,
    /// Client-reported submission time, kept for tie-breaking.
    pub timestamp: u64,
}

impl LeaderboardEntry {
    /// Build an entry from a submission that already passed validation,
    /// so the narrowing casts cannot lose information.
    pub fn from_submission(submission: &ScoreSubmission) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            score: submission.score as u32,
            difficulty: submission.difficulty.clone(),
            snake_length: submission.snake_length as u32,
            game_time: submission.game_time as u64,
            timestamp: submission.timestamp as u64,
        }
    }
}

/// Payload format tag written into every persisted board.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// The full persisted board.
///
/// The payload's `version` field is the format tag; the backing key's
/// own version counter is kept separately in `store_version` and never
/// travels inside the serialized payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    #[serde(rename = "version", default = "format_version")]
    pub format: u32,
    #[serde(skip)]
    pub store_version: u64,
    pub last_updated: u64,
    pub scores: Vec<LeaderboardEntry>,
}

fn format_version() -> u32 {
    SNAPSHOT_FORMAT_VERSION
}

impl LeaderboardSnapshot {
    pub fn empty() -> Self {
        Self {
            format: SNAPSHOT_FORMAT_VERSION,
            store_version: 0,
            last_updated: 0,
            scores: Vec::new(),
        }
    }

    /// Insert an entry at its rank, keeping the board sorted and capped.
    ///
    /// Ordering is score descending, with earlier submissions winning
    /// ties. Returns the 1-based rank when the entry made the board.
    pub fn insert_ranked(&mut self, entry: LeaderboardEntry) -> Option<u32> {
        let id = entry.id.clone();
        self.scores.push(entry);
        self.scores
            .sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
        self.scores.truncate(LEADERBOARD_CAP);
        self.scores
            .iter()
            .position(|e| e.id == id)
            .map(|i| (i + 1) as u32)
    }
}
