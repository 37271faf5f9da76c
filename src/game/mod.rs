//! Deterministic snake simulation: grid, difficulty tiers, state, engine

pub mod difficulty;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod state;

pub use difficulty::{Difficulty, DifficultyParams};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use grid::Cell;
pub use state::{GameOverCause, GameState, GameStatus, GameView};
