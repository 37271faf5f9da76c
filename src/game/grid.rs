//! Cell struct for grid positions

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::config::{GRID_HEIGHT, GRID_WIDTH};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Create a new cell
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell adjacent to this one in the given direction.
    ///
    /// No wrap-around: the result may lie outside the grid, which the
    /// engine treats as a terminal collision.
    pub fn offset(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Whether this cell lies inside the grid bounds
    pub fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < GRID_WIDTH && self.y >= 0 && self.y < GRID_HEIGHT
    }

    /// The center of the grid (rounded down for even dimensions)
    pub fn center() -> Self {
        Cell::new(GRID_WIDTH / 2, GRID_HEIGHT / 2)
    }

    /// A uniformly random in-bounds cell from the injected rng
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let x = rng.gen_range(0..GRID_WIDTH);
        let y = rng.gen_range(0..GRID_HEIGHT);
        Cell::new(x, y)
    }
}

/// Iterate every cell of the grid in row-major order
pub fn all_cells() -> impl Iterator<Item = Cell> {
    (0..GRID_HEIGHT).flat_map(|y| (0..GRID_WIDTH).map(move |x| Cell::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_offset() {
        let cell = Cell::new(5, 5);

        assert_eq!(cell.offset(Direction::North), Cell::new(5, 4));
        assert_eq!(cell.offset(Direction::South), Cell::new(5, 6));
        assert_eq!(cell.offset(Direction::West), Cell::new(4, 5));
        assert_eq!(cell.offset(Direction::East), Cell::new(6, 5));
    }

    #[test]
    fn test_no_wrap_around() {
        // Edges step out of bounds instead of wrapping
        assert!(!Cell::new(0, 5).offset(Direction::West).in_bounds());
        assert!(!Cell::new(GRID_WIDTH - 1, 5).offset(Direction::East).in_bounds());
        assert!(!Cell::new(5, 0).offset(Direction::North).in_bounds());
        assert!(!Cell::new(5, GRID_HEIGHT - 1).offset(Direction::South).in_bounds());
    }

    #[test]
    fn test_random_is_in_bounds_and_seeded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(Cell::random(&mut rng).in_bounds());
        }

        // Same seed, same sequence
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(Cell::random(&mut a), Cell::random(&mut b));
        }
    }

    #[test]
    fn test_all_cells_covers_grid() {
        let cells: Vec<Cell> = all_cells().collect();
        assert_eq!(cells.len(), (GRID_WIDTH * GRID_HEIGHT) as usize);
        assert!(cells.iter().all(|c| c.in_bounds()));
    }
}
