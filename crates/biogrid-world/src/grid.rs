//! Bounded 2D grid geometry.

use biogrid_core::{Direction, Position};
use serde::{Deserialize, Serialize};

/// A bounded (non-wrapping) grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Clamp a position onto the grid
    pub fn clamp(&self, pos: Position) -> Position {
        pos.clamp(self.width, self.height)
    }

    /// In-bounds Moore neighbours of a position, never the position itself
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::all()
            .into_iter()
            .map(move |direction| {
                let (dx, dy) = direction.to_delta();
                pos.add(dx, dy)
            })
            .filter(move |candidate| self.contains(*candidate))
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of an in-bounds position
    pub fn pos_to_index(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    /// Iterator over all positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).map(move |i| self.index_to_pos(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 8);
        assert_eq!(grid.cell_count(), 80);
        assert_eq!(grid.positions().count(), 80);
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(10, 10);
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(9, 9)));
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(10, 5)));
        assert_eq!(grid.clamp(Position::new(-4, 14)), Position::new(0, 9));
    }

    #[test]
    fn test_neighbors_exclude_center() {
        let grid = Grid::new(10, 10);
        let center = Position::new(5, 5);
        let neighbors: Vec<_> = grid.neighbors(center).collect();

        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&center));
        assert!(neighbors.iter().all(|n| n.chebyshev_distance(&center) == 1));
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let grid = Grid::new(10, 10);
        let neighbors: Vec<_> = grid.neighbors(Position::new(0, 0)).collect();
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.contains(&Position::new(1, 0)));
        assert!(neighbors.contains(&Position::new(0, 1)));
        assert!(neighbors.contains(&Position::new(1, 1)));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_large_grid_indexing_does_not_overflow_i32() {
        let grid = Grid::new(50_000, 50_000);
        assert_eq!(grid.cell_count(), 2_500_000_000);

        let corner = Position::new(49_999, 49_999);
        assert_eq!(grid.pos_to_index(corner), 2_499_999_999);
        assert_eq!(grid.index_to_pos(2_499_999_999), corner);
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(7, 3);
        let pos = Position::new(4, 2);
        assert_eq!(grid.index_to_pos(grid.pos_to_index(pos)), pos);
    }
}
