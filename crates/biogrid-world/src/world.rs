//! The world: grid, live organisms and the per-tick phases.
//!
//! Phases mutate the organism store in place and walk it in insertion order,
//! so an organism processed later in a phase sees what earlier ones did. This
//! is load-bearing in the move phase, where it keeps one organism per cell.

use crate::grid::Grid;
use crate::organism::{Organism, OrganismView};
use biogrid_core::{
    DynamicRules, Error, Kind, OrganismId, PopulationCensus, Position, Result, SimulationConfig,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, event, trace, warn, Level};

pub struct World {
    grid: Grid,
    organisms: HashMap<OrganismId, Organism>,
    order: Vec<OrganismId>,
    occupancy: HashMap<Position, OrganismId>,
    rules: DynamicRules,
    rng: ChaCha8Rng,
    tick: u64,
}

/// A carnivore eating a herbivore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predation {
    pub predator: OrganismId,
    pub prey: OrganismId,
    pub health_gained: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Not in the world (already eaten)
    Absent,
    /// Herbivores have no food source yet
    Idle,
    Ate(Predation),
    Hungry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Absent,
    /// Drew a zero offset (or was clamped back onto its own cell)
    Stayed,
    Moved(Position),
    Blocked(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Age,
    Starvation,
}

#[derive(Debug, Clone)]
pub struct Death {
    pub cause: DeathCause,
    pub organism: Organism,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveSummary {
    pub moved: usize,
    pub blocked: usize,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub predations: usize,
    pub deaths_by_age: usize,
    pub deaths_by_starvation: usize,
    pub births: usize,
    pub moves: usize,
    pub blocked_moves: usize,
    pub census: PopulationCensus,
}

/// Read-only roster for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub width: i32,
    pub height: i32,
    pub organisms: Vec<OrganismView>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl World {
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        Self {
            grid: Grid::new(width, height),
            organisms: HashMap::new(),
            order: Vec::new(),
            occupancy: HashMap::new(),
            rules: DynamicRules::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
        }
    }

    pub fn with_rules(mut self, rules: DynamicRules) -> Self {
        self.rules = rules;
        self
    }

    /// Validate the configuration and seed the initial roster
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut world = Self::new(config.world.width, config.world.height, config.seed)
            .with_rules(config.rules.clone());
        for seed in &config.organisms {
            world.add_organism(Organism::from_seed(seed));
        }
        Ok(world)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> i32 {
        self.grid.width
    }

    pub fn height(&self) -> i32 {
        self.grid.height
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn rules(&self) -> &DynamicRules {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.order.is_empty()
    }

    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(&id)
    }

    /// Live organisms in insertion order
    pub fn organisms(&self) -> impl Iterator<Item = &Organism> + '_ {
        self.order.iter().filter_map(move |id| self.organisms.get(id))
    }

    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        !self.occupancy.contains_key(&Position::new(x, y))
    }

    /// Empty in-bounds Moore neighbours of `(x, y)`; never the cell itself
    pub fn empty_neighbors(&self, x: i32, y: i32) -> Vec<Position> {
        self.grid
            .neighbors(Position::new(x, y))
            .filter(|pos| self.is_empty(pos.x, pos.y))
            .collect()
    }

    pub fn add_organism(&mut self, organism: Organism) -> OrganismId {
        let id = organism.id;
        debug_assert!(self.grid.contains(organism.position));
        debug_assert!(self.is_empty(organism.position.x, organism.position.y));

        self.occupancy.insert(organism.position, id);
        self.order.push(id);
        self.organisms.insert(id, organism);
        id
    }

    pub fn remove_organism(&mut self, id: OrganismId) -> Result<Organism> {
        let organism = self
            .organisms
            .remove(&id)
            .ok_or_else(|| Error::NotFound(format!("organism {}", id)))?;

        self.order.retain(|other| *other != id);
        if self.occupancy.get(&organism.position) == Some(&id) {
            self.occupancy.remove(&organism.position);
        }
        Ok(organism)
    }

    pub fn age_all(&mut self) {
        for organism in self.organisms.values_mut() {
            organism.age_one_step();
        }
    }

    /// Feed every organism in insertion order against the live collection.
    ///
    /// Prey eaten by an earlier carnivore is gone for later ones.
    pub fn feed_all(&mut self) -> Vec<Predation> {
        let mut predations = Vec::new();
        for id in self.order.clone() {
            if let FeedOutcome::Ate(predation) = self.feed_organism(id) {
                predations.push(predation);
            }
        }
        predations
    }

    pub fn feed_organism(&mut self, id: OrganismId) -> FeedOutcome {
        let Some(organism) = self.organisms.get(&id) else {
            return FeedOutcome::Absent;
        };

        let kind = organism.kind;
        match kind {
            Kind::Herbivore => FeedOutcome::Idle,
            Kind::Carnivore => self.hunt(id),
        }
    }

    fn hunt(&mut self, id: OrganismId) -> FeedOutcome {
        let prey = if self.rules.allow_predation {
            self.prey_in_range(id)
        } else {
            Vec::new()
        };

        if let Some(&prey_id) = prey.choose(&mut self.rng) {
            match self.remove_organism(prey_id) {
                Ok(victim) => {
                    if let Some(predator) = self.organisms.get_mut(&id) {
                        predator.eat(victim.health);
                        debug!(
                            event = "predation",
                            predator_id = %id,
                            prey_id = %prey_id,
                            prey_health = victim.health,
                            predator_health = predator.health,
                            tick = self.tick,
                            "Carnivore ate herbivore"
                        );
                    }
                    return FeedOutcome::Ate(Predation {
                        predator: id,
                        prey: prey_id,
                        health_gained: victim.health,
                    });
                }
                Err(e) => {
                    warn!(predator_id = %id, error = %e, "Prey vanished before it could be eaten");
                }
            }
        }

        if let Some(predator) = self.organisms.get_mut(&id) {
            predator.go_hungry();
            trace!(
                organism_id = %id,
                health = predator.health,
                tick = self.tick,
                "No prey in range"
            );
        }
        FeedOutcome::Hungry
    }

    fn prey_in_range(&self, id: OrganismId) -> Vec<OrganismId> {
        let Some(hunter) = self.organisms.get(&id) else {
            return Vec::new();
        };

        self.organisms()
            .filter(|o| o.kind == Kind::Herbivore && hunter.in_strike_range(o.position))
            .map(|o| o.id)
            .collect()
    }

    /// Remove organisms past their lifespan (and starved ones when that rule is on)
    pub fn cull_dead(&mut self) -> Vec<Death> {
        let starvation_death = self.rules.starvation_death;
        let doomed: Vec<(OrganismId, DeathCause)> = self
            .organisms()
            .filter_map(|o| {
                if o.is_expired() {
                    Some((o.id, DeathCause::Age))
                } else if starvation_death && o.is_starved() {
                    Some((o.id, DeathCause::Starvation))
                } else {
                    None
                }
            })
            .collect();

        let mut deaths = Vec::with_capacity(doomed.len());
        for (id, cause) in doomed {
            match self.remove_organism(id) {
                Ok(organism) => {
                    debug!(
                        event = "organism_death",
                        organism_id = %id,
                        kind = %organism.kind,
                        cause = ?cause,
                        age = organism.age,
                        health = organism.health,
                        offspring_count = organism.metrics.offspring_count,
                        tick = self.tick,
                        "Organism died"
                    );
                    deaths.push(Death { cause, organism });
                }
                Err(e) => warn!(organism_id = %id, error = %e, "Cull skipped missing organism"),
            }
        }
        deaths
    }

    /// Evaluate every organism against the world as it stood at phase start,
    /// then append the newborns.
    pub fn reproduce_all(&mut self) -> Vec<OrganismId> {
        let mut litter: Vec<(OrganismId, Organism)> = Vec::new();
        let mut claimed: HashSet<Position> = HashSet::new();

        for parent_id in self.order.clone() {
            if let Some(cap) = self.rules.max_population {
                if self.len() + litter.len() >= cap {
                    trace!(
                        population = self.len() + litter.len(),
                        max_population = cap,
                        tick = self.tick,
                        "Reproduction halted: max population reached"
                    );
                    break;
                }
            }

            let Some(child) = self.reproduce_organism(parent_id) else {
                continue;
            };

            // Two parents may have picked the same free cell; the first claim wins.
            if !claimed.insert(child.position) {
                trace!(
                    parent_id = %parent_id,
                    position = %child.position,
                    tick = self.tick,
                    "Offspring discarded: cell already claimed this phase"
                );
                continue;
            }
            litter.push((parent_id, child));
        }

        let mut born = Vec::with_capacity(litter.len());
        for (parent_id, child) in litter {
            if let Some(parent) = self.organisms.get_mut(&parent_id) {
                parent.record_offspring();
            }
            debug!(
                event = "birth",
                parent_id = %parent_id,
                offspring_id = %child.id,
                kind = %child.kind,
                position = %child.position,
                health = child.health,
                tick = self.tick,
                "Organism born"
            );
            born.push(self.add_organism(child));
        }

        if !born.is_empty() {
            event!(
                Level::DEBUG,
                counter_name = "births",
                counter_value = born.len(),
                tick = self.tick,
                "Birth counter"
            );
        }
        born
    }

    /// Draw against the reproduction rate and, on success, place a newborn on a
    /// random empty neighbour. The newborn is returned, not added.
    pub fn reproduce_organism(&mut self, id: OrganismId) -> Option<Organism> {
        if !self.rules.allow_reproduction {
            return None;
        }

        let position = {
            let parent = self.organisms.get(&id)?;
            if !parent.wants_to_reproduce(&mut self.rng) {
                return None;
            }
            parent.position
        };

        let neighbors = self.empty_neighbors(position.x, position.y);
        let Some(&cell) = neighbors.choose(&mut self.rng) else {
            event!(
                Level::TRACE,
                counter_name = "reproduction_failures",
                counter_value = 1,
                failure_reason = "no_empty_neighbor",
                organism_id = %id,
                position = %position,
                tick = self.tick,
                "Reproduction attempt failed"
            );
            return None;
        };

        self.organisms
            .get(&id)
            .map(|parent| parent.offspring(cell, self.tick))
    }

    /// Move every organism in insertion order; later movers see earlier moves.
    pub fn move_all(&mut self) -> MoveSummary {
        let mut summary = MoveSummary::default();
        for id in self.order.clone() {
            match self.move_organism(id) {
                MoveOutcome::Moved(_) => summary.moved += 1,
                MoveOutcome::Blocked(_) => summary.blocked += 1,
                MoveOutcome::Stayed | MoveOutcome::Absent => {}
            }
        }
        summary
    }

    pub fn move_organism(&mut self, id: OrganismId) -> MoveOutcome {
        let (from, candidate) = {
            let Some(organism) = self.organisms.get(&id) else {
                return MoveOutcome::Absent;
            };
            (
                organism.position,
                organism.movement_candidate(&mut self.rng, &self.grid),
            )
        };

        if candidate == from {
            return MoveOutcome::Stayed;
        }

        if !self.is_empty(candidate.x, candidate.y) {
            trace!(
                organism_id = %id,
                from = %from,
                to = %candidate,
                tick = self.tick,
                "Move blocked: cell occupied"
            );
            return MoveOutcome::Blocked(candidate);
        }

        self.occupancy.remove(&from);
        self.occupancy.insert(candidate, id);
        if let Some(organism) = self.organisms.get_mut(&id) {
            organism.move_to(candidate);
        }
        MoveOutcome::Moved(candidate)
    }

    /// Run one tick: age, feed, cull, reproduce, move.
    pub fn advance_tick(&mut self) -> TickReport {
        self.tick += 1;

        self.age_all();
        let predations = self.feed_all();
        let deaths = self.cull_dead();
        let births = self.reproduce_all();
        let moves = self.move_all();

        let deaths_by_age = deaths
            .iter()
            .filter(|d| d.cause == DeathCause::Age)
            .count();

        TickReport {
            tick: self.tick,
            predations: predations.len(),
            deaths_by_age,
            deaths_by_starvation: deaths.len() - deaths_by_age,
            births: births.len(),
            moves: moves.moved,
            blocked_moves: moves.blocked,
            census: self.census(),
        }
    }

    pub fn census(&self) -> PopulationCensus {
        let mut census = PopulationCensus::new();
        for organism in self.organisms() {
            census.record(organism.kind, organism.health, organism.age);
        }
        census
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            width: self.grid.width,
            height: self.grid.height,
            organisms: self.organisms().map(OrganismView::from).collect(),
        }
    }
}
