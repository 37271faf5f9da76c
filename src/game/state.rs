//! Game state owned by the simulation engine

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::Cell;

/// Lifecycle status of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// No difficulty selected yet
    Idle,
    /// Difficulty selected, waiting for the start command
    AwaitingStart,
    /// Ticks are being processed
    Running,
    /// Terminal collision happened; restart is the only way forward
    GameOver,
}

/// What ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    /// Head crossed the grid boundary
    Wall,
    /// Head landed on another segment
    SelfCollision,
}

/// Complete state of one game.
///
/// Owned and mutated exclusively by the `GameEngine` that created it;
/// collaborators only ever see a `GameView` copy.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Body segments, head first, tail last
    pub segments: VecDeque<Cell>,
    /// Direction committed at the start of the last tick
    pub direction: Direction,
    /// Direction requested for the next tick; never the reverse of `direction`
    pub pending_direction: Direction,
    /// Current food cell; never on a segment
    pub food: Cell,
    /// Accumulated score, always a multiple of the per-food value
    pub score: u32,
    /// Current tick interval in milliseconds; non-increasing while running
    pub speed_ms: u64,
    /// Lifecycle status
    pub status: GameStatus,
    /// Millisecond epoch recorded when the game entered Running
    pub started_at_ms: u64,
    /// Set on a capture tick; consumed (tail retained) on the next tick
    pub growing: bool,
}

impl GameState {
    /// The head cell
    pub fn head(&self) -> Cell {
        *self.segments.front().expect("snake always has a head")
    }

    /// Whether any segment occupies the given cell
    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }
}

/// Read-only snapshot handed to display collaborators
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub segments: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
    pub speed_ms: u64,
    pub status: GameStatus,
}

impl GameView {
    /// View reported before any difficulty has been selected
    pub fn idle() -> Self {
        Self {
            segments: Vec::new(),
            food: Cell::new(0, 0),
            score: 0,
            speed_ms: 0,
            status: GameStatus::Idle,
        }
    }
}
