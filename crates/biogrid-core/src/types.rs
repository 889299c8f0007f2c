//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an organism instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Clamp into `[0, width) x [0, height)`. Edges shrink the reachable range, they do not wrap.
    pub fn clamp(&self, width: i32, height: i32) -> Self {
        Self {
            x: self.x.clamp(0, width - 1),
            y: self.y.clamp(0, height - 1),
        }
    }

    /// Chebyshev distance (square neighbourhood) to another position
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight compass directions of the Moore neighbourhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }
}

/// Feeding classification of an organism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Herbivore,
    Carnivore,
}

impl Kind {
    /// Single-character tag used by the console frame
    pub fn glyph(&self) -> char {
        match self {
            Kind::Herbivore => 'H',
            Kind::Carnivore => 'C',
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Herbivore => write!(f, "herbivore"),
            Kind::Carnivore => write!(f, "carnivore"),
        }
    }
}

/// Static traits, inherited unchanged by offspring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    /// Movement radius, also the carnivore strike radius
    pub speed: i32,
    /// Reserved; no rule reads it yet
    pub strength: i32,
    /// Per-tick probability of reproducing, in [0, 1]
    pub reproduction_rate: f64,
    /// Age in ticks at which the organism is culled
    pub lifespan: u64,
    /// Health lost on a tick without prey (carnivores only)
    #[serde(default)]
    pub hunger_decrement: i32,
}

impl Traits {
    pub fn validate(&self) -> Result<(), String> {
        if self.speed < 0 {
            return Err(format!("speed must be non-negative, got {}", self.speed));
        }
        if !(0.0..=1.0).contains(&self.reproduction_rate) {
            return Err(format!(
                "reproduction_rate must be within [0, 1], got {}",
                self.reproduction_rate
            ));
        }
        if self.lifespan == 0 {
            return Err("lifespan must be greater than zero".to_string());
        }
        if self.hunger_decrement < 0 {
            return Err(format!(
                "hunger_decrement must be non-negative, got {}",
                self.hunger_decrement
            ));
        }
        Ok(())
    }
}
