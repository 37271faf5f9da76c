//! Arcade snake with a globally ranked score service.
//!
//! The crate has two halves that share one data model:
//!
//! - a deterministic, seedable snake simulation (`game`) plus a session
//!   controller (`session`) that runs it on tokio timers and reports
//!   finished games;
//! - a score ranking service (`leaderboard`) with plausibility
//!   validation, per-source rate limiting, a versioned store, and a
//!   cached query path, exposed over HTTP (`http`).
//!
//! The binary in `main.rs` serves the HTTP API; everything else is
//! usable as a library.

pub mod config;
pub mod error;
pub mod event_logger;
pub mod game;
pub mod http;
pub mod leaderboard;
pub mod protocol;
pub mod session;
pub mod state;

pub use error::{RejectReason, StoreError, SubmitError};
pub use game::{Cell, Difficulty, Direction, GameEngine, GameStatus, GameView, TickOutcome};
pub use leaderboard::{
    LeaderboardEntry, LeaderboardSnapshot, QueryService, ScoreSubmission, SubmissionService,
};
pub use session::{spawn_session, GameSession, ScoreReport, SessionCommand, SessionHandle};
pub use state::AppState;
