//! Character frame projected from a world snapshot.

use crate::grid::Grid;
use crate::world::{World, WorldSnapshot};
use biogrid_core::Position;
use std::fmt;

pub const EMPTY_CELL: char = '.';

/// A height x width grid of cell tags: `H`, `C` or `.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    grid: Grid,
    cells: Vec<char>,
}

impl Frame {
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> Self {
        let grid = Grid::new(snapshot.width, snapshot.height);
        let mut cells = vec![EMPTY_CELL; grid.cell_count()];

        for organism in &snapshot.organisms {
            if !grid.contains(organism.position) {
                continue;
            }
            // First organism listed on a cell wins.
            let cell = &mut cells[grid.pos_to_index(organism.position)];
            if *cell == EMPTY_CELL {
                *cell = organism.kind.glyph();
            }
        }

        Self { grid, cells }
    }

    pub fn cell(&self, pos: Position) -> Option<char> {
        if self.grid.contains(pos) {
            Some(self.cells[self.grid.pos_to_index(pos)])
        } else {
            None
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.grid.width.max(1) as usize)
            .map(|row| {
                row.iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl World {
    pub fn frame(&self) -> Frame {
        Frame::from_snapshot(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organism::Organism;
    use biogrid_core::{Kind, Traits};

    fn traits() -> Traits {
        Traits {
            speed: 1,
            strength: 1,
            reproduction_rate: 0.0,
            lifespan: 10,
            hunger_decrement: 1,
        }
    }

    #[test]
    fn test_empty_world_frame() {
        let world = World::new(3, 2, 0);
        let frame = world.frame();
        assert_eq!(frame.rows(), vec![". . .", ". . ."]);
        assert_eq!(frame.to_string(), ". . .\n. . .\n");
    }

    #[test]
    fn test_frame_places_glyphs() {
        let mut world = World::new(4, 3, 0);
        world.add_organism(Organism::new(Kind::Herbivore, traits(), 5, Position::new(0, 0)));
        world.add_organism(Organism::new(Kind::Carnivore, traits(), 5, Position::new(3, 2)));

        let frame = world.frame();
        assert_eq!(frame.cell(Position::new(0, 0)), Some('H'));
        assert_eq!(frame.cell(Position::new(3, 2)), Some('C'));
        assert_eq!(frame.cell(Position::new(1, 1)), Some('.'));
        assert_eq!(frame.cell(Position::new(4, 0)), None);
        assert_eq!(frame.rows(), vec!["H . . .", ". . . .", ". . . C"]);
    }
}
