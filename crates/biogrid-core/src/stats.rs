//! Life and population statistics.

use crate::Kind;
use serde::{Deserialize, Serialize};

/// Per-organism counters accumulated over its lifetime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeMetrics {
    /// Total offspring produced
    pub offspring_count: u32,
    /// Herbivores eaten (carnivores only)
    pub prey_eaten: u32,
    /// Moves actually committed
    pub moves: u32,
    /// Feed phases that ended without food
    pub hungry_ticks: u32,
}

impl LifeMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Aggregate view of the live population at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationCensus {
    pub herbivores: usize,
    pub carnivores: usize,
    pub total_health: i64,
    pub min_health: Option<i32>,
    pub max_health: Option<i32>,
    pub total_age: u64,
    pub max_age: u64,
}

impl PopulationCensus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one organism into the census
    pub fn record(&mut self, kind: Kind, health: i32, age: u64) {
        match kind {
            Kind::Herbivore => self.herbivores += 1,
            Kind::Carnivore => self.carnivores += 1,
        }
        self.total_health += health as i64;
        self.min_health = Some(self.min_health.map_or(health, |m| m.min(health)));
        self.max_health = Some(self.max_health.map_or(health, |m| m.max(health)));
        self.total_age += age;
        self.max_age = self.max_age.max(age);
    }

    pub fn total(&self) -> usize {
        self.herbivores + self.carnivores
    }

    pub fn is_extinct(&self) -> bool {
        self.total() == 0
    }

    pub fn avg_health(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.total_health as f64 / self.total() as f64
        }
    }

    pub fn avg_age(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.total_age as f64 / self.total() as f64
        }
    }
}
