//! World simulation engine.
//!
//! This module implements the bounded 2D grid where herbivores and carnivores
//! age, feed, reproduce, move and die, one tick at a time.

pub mod control;
pub mod grid;
pub mod organism;
pub mod render;
pub mod simulation;
pub mod world;

pub use control::ControlHandle;
pub use grid::Grid;
pub use organism::{Organism, OrganismView};
pub use render::Frame;
pub use simulation::{RunSummary, RunTotals, Simulation};
pub use world::{
    Death, DeathCause, FeedOutcome, MoveOutcome, MoveSummary, Predation, TickReport, World,
    WorldSnapshot,
};
