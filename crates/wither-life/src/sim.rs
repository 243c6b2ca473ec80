// SPDX-License-Identifier: MIT
//
// Simulation: the population, its death rule, and the run state.
//
//   Running ──(population empty after a cull)──▶ Extinct
//      │
//      └────(interrupt observed)───────────────▶ Interrupted
//
// Both exits are terminal. A simulation spawned with no cells starts out
// Extinct. Stepping a finished simulation does nothing.

use rand::Rng;
use tracing::{debug, info};
use wither_term::Area;

use crate::config::{Config, ConfigError};
use crate::cull::CullPolicy;
use crate::population::Population;
use crate::spawn::spawn;

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Running,
    /// Every cell has died.
    Extinct,
    /// Stopped from outside.
    Interrupted,
}

impl State {
    /// Whether no further generations will run.
    #[inline]
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// A decaying population on a fixed grid.
#[derive(Debug, Clone)]
pub struct Simulation {
    area: Area,
    population: Population,
    policy: CullPolicy,
    state: State,
    generation: u64,
}

impl Simulation {
    /// Start a run from an existing population.
    #[must_use]
    pub fn new(area: Area, population: Population, policy: CullPolicy) -> Self {
        let state = if population.is_empty() {
            State::Extinct
        } else {
            State::Running
        };
        Self {
            area,
            population,
            policy,
            state,
            generation: 0,
        }
    }

    /// Validate `config` and spawn its initial population.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`Config::validate`].
    pub fn from_config(config: &Config, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let area = config.area()?;
        let population = spawn(area, config.population, rng);
        Ok(Self::new(area, population, config.cull_policy()))
    }

    /// The grid.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> Area {
        self.area
    }

    /// The live cells.
    #[inline]
    #[must_use]
    pub const fn population(&self) -> &Population {
        &self.population
    }

    /// The death rule.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> CullPolicy {
        self.policy
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Generations completed so far.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop a running simulation. No effect once finished.
    pub fn interrupt(&mut self) {
        if self.state == State::Running {
            self.state = State::Interrupted;
            info!(generation = self.generation, "simulation interrupted");
        }
    }

    /// Run one generation: cull, and go Extinct if nothing survives.
    ///
    /// Returns the cells that died (empty if the run had already finished).
    pub fn step(&mut self) -> Population {
        if self.state.is_finished() {
            return Population::new();
        }

        let culled = self.policy.apply(&mut self.population, self.area);
        self.generation += 1;
        debug!(
            generation = self.generation,
            culled = culled.len(),
            alive = self.population.len(),
            "generation complete"
        );

        if self.population.is_empty() {
            self.state = State::Extinct;
            info!(generation = self.generation, "population extinct");
        }
        culled
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
