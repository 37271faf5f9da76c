//! Simulation engine - owns one game's state and advances it tick by tick

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{
    FOOD_PLACEMENT_ATTEMPTS, INITIAL_SNAKE_LENGTH, MIN_TICK_INTERVAL_MS, POINTS_PER_FOOD,
};

use super::difficulty::Difficulty;
use super::direction::Direction;
use super::grid::{all_cells, Cell};
use super::state::{GameOverCause, GameState, GameStatus, GameView};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick arrived while the game was not running; nothing changed
    Ignored,
    /// The snake advanced one cell; `captured` marks a food capture
    Advanced { captured: bool },
    /// A terminal collision happened this tick
    GameOver(GameOverCause),
}

/// Simulation engine for a single game.
///
/// Owns its `GameState` exclusively; randomness comes from an injected
/// seeded source so runs are reproducible. The engine performs no I/O
/// and keeps no clock: the session controller schedules `tick()` and
/// `relocate_food()` at the cadence the current state dictates.
#[derive(Debug)]
pub struct GameEngine {
    state: GameState,
    difficulty: Difficulty,
    rng: StdRng,
}

impl GameEngine {
    /// Create an engine at the awaiting-start baseline for a difficulty tier.
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let mut engine = Self {
            state: GameState {
                segments: VecDeque::new(),
                direction: Direction::East,
                pending_direction: Direction::East,
                food: Cell::new(0, 0),
                score: 0,
                speed_ms: difficulty.params().initial_speed_ms,
                status: GameStatus::AwaitingStart,
                started_at_ms: 0,
                growing: false,
            },
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        };
        engine.rebuild_baseline();
        engine
    }

    /// Reset to the awaiting-start baseline, keeping difficulty and rng.
    pub fn reset(&mut self) {
        self.rebuild_baseline();
    }

    fn rebuild_baseline(&mut self) {
        let params = self.difficulty.params();

        // Centered snake facing east, body extending west of the head
        let head = Cell::center();
        let mut segments = VecDeque::with_capacity(INITIAL_SNAKE_LENGTH);
        segments.push_back(head);
        let mut current = head;
        for _ in 1..INITIAL_SNAKE_LENGTH {
            current = current.offset(Direction::West);
            segments.push_back(current);
        }

        self.state.segments = segments;
        self.state.direction = Direction::East;
        self.state.pending_direction = Direction::East;
        self.state.score = 0;
        self.state.speed_ms = params.initial_speed_ms;
        self.state.status = GameStatus::AwaitingStart;
        self.state.started_at_ms = 0;
        self.state.growing = false;
        self.place_food();
    }

    /// Begin processing ticks. Only valid from AwaitingStart; a finished
    /// game must be restarted first.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.state.status != GameStatus::AwaitingStart {
            return false;
        }
        self.state.status = GameStatus::Running;
        self.state.started_at_ms = now_ms;
        true
    }

    /// Return a finished game to the awaiting-start baseline. The
    /// difficulty is retained and all counters reset.
    pub fn restart(&mut self) -> bool {
        match self.state.status {
            GameStatus::GameOver | GameStatus::AwaitingStart => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Request a direction change for the next tick.
    ///
    /// A request for the exact opposite of the current direction is
    /// silently dropped; that is routine input noise, not an error.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if direction.is_opposite(&self.state.direction) {
            return;
        }
        self.state.pending_direction = direction;
    }

    /// Advance the simulation by one step.
    ///
    /// The sole state-advancing operation: commits the pending direction,
    /// moves the head one cell, resolves collisions, and resolves food
    /// capture. Ticks outside Running are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.status != GameStatus::Running {
            return TickOutcome::Ignored;
        }

        self.state.direction = self.state.pending_direction;
        let new_head = self.state.head().offset(self.state.direction);

        if !new_head.in_bounds() {
            self.state.status = GameStatus::GameOver;
            return TickOutcome::GameOver(GameOverCause::Wall);
        }

        // Unless the snake grows this tick, the tail vacates its cell and
        // moving into it is legal.
        let body_len = self.state.segments.len();
        let blocking = if self.state.growing {
            body_len
        } else {
            body_len - 1
        };
        if self
            .state
            .segments
            .iter()
            .take(blocking)
            .any(|segment| *segment == new_head)
        {
            self.state.status = GameStatus::GameOver;
            return TickOutcome::GameOver(GameOverCause::SelfCollision);
        }

        if self.state.growing {
            self.state.growing = false;
        } else {
            self.state.segments.pop_back();
        }
        self.state.segments.push_front(new_head);

        let captured = new_head == self.state.food;
        if captured {
            let params = self.difficulty.params();
            self.state.score += POINTS_PER_FOOD;
            self.state.growing = true;
            self.state.speed_ms = self
                .state
                .speed_ms
                .saturating_sub(params.speed_decrement_ms)
                .max(MIN_TICK_INTERVAL_MS);
            self.place_food();
        }

        TickOutcome::Advanced { captured }
    }

    /// Move the food to a fresh random cell. Fired by the session when the
    /// difficulty's food timeout elapses without a capture.
    pub fn relocate_food(&mut self) -> bool {
        if self.state.status != GameStatus::Running {
            return false;
        }
        self.place_food();
        true
    }

    fn place_food(&mut self) {
        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            let cell = Cell::random(&mut self.rng);
            if !self.state.occupies(cell) {
                self.state.food = cell;
                return;
            }
        }

        // Crowded grid: pick uniformly among the remaining free cells
        let free: Vec<Cell> = all_cells().filter(|c| !self.state.occupies(*c)).collect();
        if free.is_empty() {
            return;
        }
        let idx = self.rng.gen_range(0..free.len());
        self.state.food = free[idx];
    }

    /// Read-only snapshot for display collaborators.
    pub fn view(&self) -> GameView {
        GameView {
            segments: self.state.segments.iter().copied().collect(),
            food: self.state.food,
            score: self.state.score,
            speed_ms: self.state.speed_ms,
            status: self.state.status,
        }
    }

    /// Borrow the full state (read-only).
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn speed_ms(&self) -> u64 {
        self.state.speed_ms
    }

    pub fn segment_count(&self) -> usize {
        self.state.segments.len()
    }

    pub fn started_at_ms(&self) -> u64 {
        self.state.started_at_ms
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Food timeout for the active difficulty, in milliseconds.
    pub fn food_timeout_ms(&self) -> u64 {
        self.difficulty.params().food_timeout_ms
    }
}
