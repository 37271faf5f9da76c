//! Direction enum for snake movement

use serde::{Deserialize, Serialize};

/// Direction of movement on the 4-neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Moving up
    North,
    /// Moving down
    South,
    /// Moving left
    West,
    /// Moving right
    East,
}

impl Direction {
    /// Unit vector for this direction, one cell per tick
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }

    /// Check if this direction is the exact opposite of another
    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::North, Direction::South)
                | (Direction::South, Direction::North)
                | (Direction::East, Direction::West)
                | (Direction::West, Direction::East)
        )
    }
}
