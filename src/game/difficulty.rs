//! Difficulty tiers and their simulation parameters

use serde::{Deserialize, Serialize};

/// Difficulty tier selected before a game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Per-tier simulation parameters
#[derive(Debug, Clone, Copy)]
pub struct DifficultyParams {
    /// Tick interval when a game starts, in milliseconds
    pub initial_speed_ms: u64,
    /// Milliseconds shaved off the tick interval per food capture
    pub speed_decrement_ms: u64,
    /// How long food stays put before relocating, in milliseconds
    pub food_timeout_ms: u64,
}

impl Difficulty {
    /// Parse a declared tier; used by the validator on untrusted input
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "EASY" => Some(Difficulty::Easy),
            "MEDIUM" => Some(Difficulty::Medium),
            "HARD" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Wire name of this tier
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    /// Simulation parameters for this tier
    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                initial_speed_ms: 200,
                speed_decrement_ms: 5,
                food_timeout_ms: 10_000,
            },
            Difficulty::Medium => DifficultyParams {
                initial_speed_ms: 150,
                speed_decrement_ms: 10,
                food_timeout_ms: 8_000,
            },
            Difficulty::Hard => DifficultyParams {
                initial_speed_ms: 100,
                speed_decrement_ms: 15,
                food_timeout_ms: 6_000,
            },
        }
    }
}
