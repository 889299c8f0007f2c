//! Organism state and per-kind behaviour.

use crate::grid::Grid;
use biogrid_core::{Kind, LifeMetrics, OrganismId, OrganismSeed, Position, Traits};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An organism in the simulation
#[derive(Debug, Clone)]
pub struct Organism {
    pub id: OrganismId,
    pub kind: Kind,
    pub traits: Traits,
    pub health: i32,
    pub position: Position,
    pub age: u64,
    pub birth_tick: u64,
    pub metrics: LifeMetrics,
}

impl Organism {
    pub fn new(kind: Kind, traits: Traits, health: i32, position: Position) -> Self {
        Self::new_with_birth_tick(kind, traits, health, position, 0)
    }

    pub fn new_with_birth_tick(
        kind: Kind,
        traits: Traits,
        health: i32,
        position: Position,
        birth_tick: u64,
    ) -> Self {
        Self {
            id: OrganismId::new(),
            kind,
            traits,
            health,
            position,
            age: 0,
            birth_tick,
            metrics: LifeMetrics::new(),
        }
    }

    pub fn from_seed(seed: &OrganismSeed) -> Self {
        Self::new(seed.kind, seed.traits.clone(), seed.health, seed.position)
    }

    pub fn age_one_step(&mut self) {
        self.age += 1;
    }

    /// Reached or passed its lifespan
    pub fn is_expired(&self) -> bool {
        self.age >= self.traits.lifespan
    }

    pub fn is_starved(&self) -> bool {
        self.health <= 0
    }

    /// Draw a destination within `speed` on each axis, clamped to the grid.
    ///
    /// The caller decides whether the cell is free; an occupied candidate means
    /// the organism stays put this tick.
    pub fn movement_candidate<R: Rng>(&self, rng: &mut R, grid: &Grid) -> Position {
        let speed = self.traits.speed;
        let dx = rng.gen_range(-speed..=speed);
        let dy = rng.gen_range(-speed..=speed);
        grid.clamp(self.position.add(dx, dy))
    }

    pub fn move_to(&mut self, new_position: Position) {
        if new_position != self.position {
            self.position = new_position;
            self.metrics.moves += 1;
        }
    }

    /// Bernoulli draw against the reproduction rate
    pub fn wants_to_reproduce<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.traits.reproduction_rate
    }

    /// Build a newborn of the same kind and traits at `position`.
    ///
    /// The newborn starts with the parent's current health.
    pub fn offspring(&self, position: Position, tick: u64) -> Organism {
        Organism::new_with_birth_tick(
            self.kind,
            self.traits.clone(),
            self.health,
            position,
            tick,
        )
    }

    pub fn record_offspring(&mut self) {
        self.metrics.offspring_count += 1;
    }

    /// Square (Chebyshev) strike range driven by speed
    pub fn in_strike_range(&self, target: Position) -> bool {
        self.position.chebyshev_distance(&target) <= self.traits.speed
    }

    pub fn eat(&mut self, prey_health: i32) {
        self.health = self.health.saturating_add(prey_health);
        self.metrics.prey_eaten += 1;
    }

    /// Health is allowed to go negative; it saturates at `i32::MIN`.
    pub fn go_hungry(&mut self) {
        self.health = self.health.saturating_sub(self.traits.hunger_decrement);
        self.metrics.hungry_ticks += 1;
    }
}

/// Read-only organism view handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismView {
    pub id: OrganismId,
    pub kind: Kind,
    pub position: Position,
    pub health: i32,
    pub age: u64,
}

impl From<&Organism> for OrganismView {
    fn from(org: &Organism) -> Self {
        Self {
            id: org.id,
            kind: org.kind,
            position: org.position,
            health: org.health,
            age: org.age,
        }
    }
}
