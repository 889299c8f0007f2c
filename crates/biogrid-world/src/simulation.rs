//! Simulation driver: ticks the world under pause/step control and reports.

use crate::control::ControlHandle;
use crate::world::{TickReport, World};
use biogrid_core::{PopulationCensus, Result, SimulationConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, instrument, Level};

pub struct Simulation {
    world: World,
    controls: ControlHandle,
    config: SimulationConfig,
    totals: RunTotals,
}

/// Cumulative counters over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub ticks: u64,
    pub births: u64,
    pub predations: u64,
    pub deaths_by_age: u64,
    pub deaths_by_starvation: u64,
}

impl RunTotals {
    fn absorb(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.births += report.births as u64;
        self.predations += report.predations as u64;
        self.deaths_by_age += report.deaths_by_age as u64;
        self.deaths_by_starvation += report.deaths_by_starvation as u64;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_tick: u64,
    pub totals: RunTotals,
    pub census: PopulationCensus,
    pub extinct: bool,
}

impl Simulation {
    /// Validates the configuration; malformed seed data never reaches a tick.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let world = World::from_config(&config)?;

        info!(
            width = config.world.width,
            height = config.world.height,
            seed = config.seed,
            organisms = world.len(),
            "Simulation initialized"
        );

        Ok(Self {
            world,
            controls: ControlHandle::new(),
            config,
            totals: RunTotals::default(),
        })
    }

    pub fn with_controls(mut self, controls: ControlHandle) -> Self {
        self.controls = controls;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tick(&self) -> u64 {
        self.world.tick()
    }

    pub fn controls(&self) -> &ControlHandle {
        &self.controls
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    /// Advance exactly one tick regardless of the control flags
    pub fn step(&mut self) -> TickReport {
        let report = self.world.advance_tick();
        self.totals.absorb(&report);

        debug!(
            tick = report.tick,
            herbivores = report.census.herbivores,
            carnivores = report.census.carnivores,
            births = report.births,
            predations = report.predations,
            deaths_by_age = report.deaths_by_age,
            deaths_by_starvation = report.deaths_by_starvation,
            moves = report.moves,
            blocked_moves = report.blocked_moves,
            "Tick complete"
        );

        let interval = self.config.metrics_interval;
        if interval > 0 && report.tick % interval == 0 {
            self.emit_population_metrics(&report);
        }

        report
    }

    /// Step if the control handle allows it (running and unpaused, or a step armed)
    pub fn poll(&mut self) -> Option<TickReport> {
        if self.controls.take_tick_permit() {
            Some(self.step())
        } else {
            None
        }
    }

    pub fn reached_tick_limit(&self) -> bool {
        self.config
            .max_ticks
            .is_some_and(|limit| self.world.tick() >= limit)
    }

    /// Stopped, out of ticks, or nothing left alive
    pub fn is_finished(&self) -> bool {
        !self.controls.is_running() || self.reached_tick_limit() || self.world.is_extinct()
    }

    /// Run headless until `max_ticks` more ticks have passed, the world empties,
    /// or the control handle is stopped.
    #[instrument(skip(self))]
    pub fn run(&mut self, max_ticks: u64) -> RunSummary {
        info!("Starting simulation for {} ticks", max_ticks);

        for _ in 0..max_ticks {
            if !self.controls.is_running() || self.world.is_extinct() {
                break;
            }
            self.step();
        }

        let summary = self.summary();
        self.emit_run_summary(&summary);
        summary
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            final_tick: self.world.tick(),
            totals: self.totals.clone(),
            census: self.world.census(),
            extinct: self.world.is_extinct(),
        }
    }

    fn emit_population_metrics(&self, report: &TickReport) {
        let census = &report.census;
        let herbivore_ratio = if census.total() > 0 {
            census.herbivores as f64 / census.total() as f64
        } else {
            0.0
        };

        info!(
            event = "population_metrics",
            tick = report.tick,
            total_population = census.total(),
            herbivores = census.herbivores,
            carnivores = census.carnivores,
            avg_health = format!("{:.2}", census.avg_health()),
            min_health = census.min_health.unwrap_or(0),
            max_health = census.max_health.unwrap_or(0),
            avg_age = format!("{:.2}", census.avg_age()),
            max_age = census.max_age,
            total_births = self.totals.births,
            total_predations = self.totals.predations,
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "population_total",
            gauge_value = census.total(),
            tick = report.tick,
            "Population gauge"
        );

        event!(
            Level::INFO,
            gauge_name = "herbivore_ratio",
            gauge_value = herbivore_ratio,
            tick = report.tick,
            "Herbivore share of population"
        );
    }

    fn emit_run_summary(&self, summary: &RunSummary) {
        info!(
            event = "run_summary",
            final_tick = summary.final_tick,
            herbivores = summary.census.herbivores,
            carnivores = summary.census.carnivores,
            births_total = summary.totals.births,
            predations_total = summary.totals.predations,
            deaths_by_age_total = summary.totals.deaths_by_age,
            deaths_by_starvation_total = summary.totals.deaths_by_starvation,
            extinct = summary.extinct,
            "Run complete"
        );

        event!(
            Level::INFO,
            gauge_name = "final_population",
            gauge_value = summary.census.total(),
            "Final population gauge"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biogrid_core::{Kind, OrganismSeed, Position, Traits};

    fn long_lived(speed: i32, rate: f64) -> Traits {
        Traits {
            speed,
            strength: 1,
            reproduction_rate: rate,
            lifespan: 1_000,
            hunger_decrement: 0,
        }
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.world().len(), 2);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = SimulationConfig::default();
        config.organisms[1].position = Position::new(-1, 0);
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_poll_respects_pause_and_step() {
        let controls = ControlHandle::with_paused(true);
        let mut sim = Simulation::new(SimulationConfig::default())
            .unwrap()
            .with_controls(controls.clone());

        assert!(sim.poll().is_none());
        assert_eq!(sim.tick(), 0);

        controls.step_once();
        let report = sim.poll().expect("armed step runs while paused");
        assert_eq!(report.tick, 1);
        assert!(sim.poll().is_none());

        controls.toggle_pause();
        assert!(sim.poll().is_some());
        assert_eq!(sim.tick(), 2);

        controls.stop();
        assert!(sim.poll().is_none());
        assert!(sim.is_finished());
    }

    #[test]
    fn test_run_stops_at_tick_budget() {
        let config = SimulationConfig {
            organisms: vec![OrganismSeed::herbivore(
                Position::new(5, 5),
                10,
                long_lived(1, 0.0),
            )],
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();

        let summary = sim.run(12);

        assert_eq!(summary.final_tick, 12);
        assert_eq!(summary.totals.ticks, 12);
        assert_eq!(summary.census.herbivores, 1);
        assert!(!summary.extinct);
    }

    #[test]
    fn test_run_stops_on_extinction() {
        let mut traits = long_lived(0, 0.0);
        traits.lifespan = 4;
        let config = SimulationConfig {
            organisms: vec![OrganismSeed::herbivore(Position::new(1, 1), 10, traits)],
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();

        let summary = sim.run(100);

        assert_eq!(summary.final_tick, 4);
        assert!(summary.extinct);
        assert_eq!(summary.totals.deaths_by_age, 1);
        assert!(sim.is_finished());
    }

    #[test]
    fn test_totals_track_predation_and_births() {
        let config = SimulationConfig {
            organisms: vec![
                OrganismSeed::carnivore(Position::new(0, 0), 10, long_lived(2, 0.0)),
                OrganismSeed::herbivore(Position::new(1, 1), 5, long_lived(0, 0.0)),
                OrganismSeed::herbivore(Position::new(8, 8), 5, long_lived(0, 1.0)),
            ],
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();

        let report = sim.step();

        assert_eq!(report.predations, 1);
        assert_eq!(report.births, 1);
        assert_eq!(sim.totals().predations, 1);
        assert_eq!(sim.totals().births, 1);
        let carnivore = sim
            .world()
            .organisms()
            .find(|o| o.kind == Kind::Carnivore)
            .unwrap();
        assert_eq!(carnivore.health, 15);
    }

    #[test]
    fn test_tick_limit_from_config() {
        let config = SimulationConfig {
            max_ticks: Some(3),
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        while !sim.is_finished() {
            sim.poll();
        }
        assert_eq!(sim.tick(), 3);
    }
}
