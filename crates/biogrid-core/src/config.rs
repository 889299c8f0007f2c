//! Configuration types for the simulation.

use crate::{Error, Kind, Position, Result, Traits};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Largest accepted world side; keeps rendered frames bounded
pub const MAX_WORLD_DIMENSION: i32 = 1024;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
        }
    }
}

/// Rule toggles layered over the base lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicRules {
    /// Carnivores may eat herbivores in strike range
    pub allow_predation: bool,
    /// Organisms may reproduce
    pub allow_reproduction: bool,
    /// Cull also removes organisms whose health dropped to zero or below
    pub starvation_death: bool,
    /// Upper bound on live organisms; reproduction stops at the cap
    pub max_population: Option<usize>,
}

impl Default for DynamicRules {
    fn default() -> Self {
        Self {
            allow_predation: true,
            allow_reproduction: true,
            starvation_death: false,
            max_population: None,
        }
    }
}

/// One organism of the initial roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismSeed {
    pub kind: Kind,
    pub health: i32,
    pub position: Position,
    #[serde(flatten)]
    pub traits: Traits,
}

impl OrganismSeed {
    pub fn herbivore(position: Position, health: i32, traits: Traits) -> Self {
        Self {
            kind: Kind::Herbivore,
            health,
            position,
            traits,
        }
    }

    pub fn carnivore(position: Position, health: i32, traits: Traits) -> Self {
        Self {
            kind: Kind::Carnivore,
            health,
            position,
            traits,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Wall-clock interval between ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Stop after this many ticks; run until stopped when absent
    pub max_ticks: Option<u64>,
    /// Census metrics are logged every this many ticks (0 disables)
    pub metrics_interval: u64,
    /// World configuration
    pub world: WorldConfig,
    /// Dynamic rules
    pub rules: DynamicRules,
    /// Initial roster
    pub organisms: Vec<OrganismSeed>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_interval_ms: 500,
            max_ticks: None,
            metrics_interval: 10,
            world: WorldConfig::default(),
            rules: DynamicRules::default(),
            organisms: vec![
                OrganismSeed::herbivore(
                    Position::new(5, 5),
                    10,
                    Traits {
                        speed: 1,
                        strength: 2,
                        reproduction_rate: 0.1,
                        lifespan: 15,
                        hunger_decrement: 0,
                    },
                ),
                OrganismSeed::carnivore(
                    Position::new(3, 7),
                    15,
                    Traits {
                        speed: 2,
                        strength: 3,
                        reproduction_rate: 0.05,
                        lifespan: 35,
                        hunger_decrement: 1,
                    },
                ),
            ],
        }
    }
}

impl SimulationConfig {
    /// Load a JSON configuration file. The result is not validated yet.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading simulation config");
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject malformed seed data before the first tick.
    pub fn validate(&self) -> Result<()> {
        let WorldConfig { width, height } = self.world;
        if width <= 0 || height <= 0 {
            return Err(Error::Validation(format!(
                "world dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if width > MAX_WORLD_DIMENSION || height > MAX_WORLD_DIMENSION {
            return Err(Error::Validation(format!(
                "world dimensions must not exceed {}, got {}x{}",
                MAX_WORLD_DIMENSION, width, height
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(Error::Validation(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        let mut occupied = HashSet::new();
        for (index, seed) in self.organisms.iter().enumerate() {
            let pos = seed.position;
            if pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height {
                return Err(Error::Validation(format!(
                    "organism {} at {} is outside the {}x{} world",
                    index, pos, width, height
                )));
            }
            if !occupied.insert(pos) {
                return Err(Error::Validation(format!(
                    "organism {} shares cell {} with another organism",
                    index, pos
                )));
            }
            seed.traits
                .validate()
                .map_err(|msg| Error::Validation(format!("organism {}: {}", index, msg)))?;
        }

        if let Some(cap) = self.rules.max_population {
            if cap == 0 {
                return Err(Error::Validation(
                    "max_population must be greater than zero when set".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.width, 10);
        assert_eq!(config.world.height, 10);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.organisms.len(), 2);
        assert!(config.validate().is_ok());

        let rules = DynamicRules::default();
        assert!(rules.allow_predation);
        assert!(!rules.starvation_death);
    }

    #[test]
    fn test_rejects_out_of_bounds_seed() {
        let mut config = SimulationConfig::default();
        config.organisms[0].position = Position::new(10, 3);
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_duplicate_positions() {
        let mut config = SimulationConfig::default();
        config.organisms[1].position = config.organisms[0].position;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_bad_traits_and_world() {
        let mut config = SimulationConfig::default();
        config.organisms[0].traits.reproduction_rate = -0.1;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.world.width = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_world() {
        let mut config = SimulationConfig::default();
        config.world.width = MAX_WORLD_DIMENSION;
        config.world.height = MAX_WORLD_DIMENSION;
        assert!(config.validate().is_ok());

        config.world.height = MAX_WORLD_DIMENSION + 1;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        config.world.height = 10;
        config.world.width = i32::MAX;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_json_loading_with_defaults() {
        let json = r#"{
            "seed": 7,
            "world": { "width": 4, "height": 3 },
            "rules": { "starvation_death": true },
            "organisms": [
                {
                    "kind": "herbivore",
                    "health": 5,
                    "position": { "x": 1, "y": 1 },
                    "speed": 1,
                    "strength": 0,
                    "reproduction_rate": 0.2,
                    "lifespan": 10
                }
            ]
        }"#;

        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world.width, 4);
        assert!(config.rules.starvation_death);
        assert!(config.rules.allow_reproduction);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.organisms[0].kind, Kind::Herbivore);
        assert_eq!(config.organisms[0].traits.hunger_decrement, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bundled_scenario_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/meadow.json");
        let config = SimulationConfig::load_from_path(path).expect("scenario parses");

        assert_eq!(config.world.width, 24);
        assert_eq!(config.rules.max_population, Some(200));
        assert_eq!(config.organisms.len(), 6);
        assert_eq!(
            config.organisms.iter().filter(|o| o.kind == Kind::Carnivore).count(),
            2
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::load_from_path("/nonexistent/biogrid.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
