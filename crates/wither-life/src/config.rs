// SPDX-License-Identifier: MIT
//
// Simulation configuration.
//
// Everything that can be wrong with a run is checked here, before the
// first generation: degenerate grids, more initial cells than the grid
// holds, a zero frame rate, a threshold no neighbor count can exceed.
// Once a Config validates, nothing in the generation loop can fail.

use std::time::Duration;

use thiserror::Error;
use wither_term::{Area, AreaError};

use crate::cull::{CullPolicy, DEFAULT_THRESHOLD};
use crate::neighbor::EdgePolicy;

/// Target generations per second unless configured.
pub const DEFAULT_FPS: u32 = 15;
/// Grid columns unless configured.
pub const DEFAULT_WIDTH: u16 = 140;
/// Grid rows unless configured.
pub const DEFAULT_HEIGHT: u16 = 50;
/// Initial live cells unless configured.
pub const DEFAULT_POPULATION: usize = 1000;
/// Largest grid a run accepts: a full-width `u16` row, 64 rows deep.
///
/// The spawner and every framebuffer plane allocate one entry per cell up
/// front, so this bounds a run's memory at a few tens of megabytes.
pub const MAX_CELLS: usize = 65_535 * 64;

/// A rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid grid: {0}")]
    Area(#[from] AreaError),
    #[error("grid of {cells} cells exceeds the limit of {max}")]
    GridTooLarge { cells: usize, max: usize },
    #[error("initial population {requested} exceeds the grid's {cells} cells")]
    PopulationTooLarge { requested: usize, cells: usize },
    #[error("frame rate must be at least 1 fps")]
    ZeroFps,
    #[error("culling threshold {threshold} exceeds the 8 possible neighbors")]
    ThresholdTooLarge { threshold: u8 },
}

/// Run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target generations per second.
    pub fps: u32,
    /// Grid columns.
    pub width: u16,
    /// Grid rows.
    pub height: u16,
    /// Live cells at generation zero.
    pub population: usize,
    /// Cells with this many neighbors or fewer die.
    pub threshold: u8,
    /// Edge handling for neighbor counts.
    pub edges: EdgePolicy,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            population: DEFAULT_POPULATION,
            threshold: DEFAULT_THRESHOLD,
            edges: EdgePolicy::default(),
            seed: None,
        }
    }
}

impl Config {
    /// The grid, if its dimensions are valid.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Area`] for a zero dimension.
    pub fn area(&self) -> Result<Area, ConfigError> {
        Ok(Area::new(self.width, self.height)?)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// The first problem found, in field order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        let cells = self.area()?.cell_count();
        if cells > MAX_CELLS {
            return Err(ConfigError::GridTooLarge {
                cells,
                max: MAX_CELLS,
            });
        }
        if self.population > cells {
            return Err(ConfigError::PopulationTooLarge {
                requested: self.population,
                cells,
            });
        }
        if self.threshold > 8 {
            return Err(ConfigError::ThresholdTooLarge {
                threshold: self.threshold,
            });
        }
        Ok(())
    }

    /// The death rule this config describes.
    #[must_use]
    pub const fn cull_policy(&self) -> CullPolicy {
        CullPolicy {
            threshold: self.threshold,
            edges: self.edges,
        }
    }

    /// Wall-clock time allotted to one generation: `1000 / fps` whole
    /// milliseconds.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.area().unwrap().cell_count(), 7000);
    }

    #[test]
    fn default_budget_is_66ms() {
        assert_eq!(Config::default().frame_budget(), Duration::from_millis(66));
    }

    #[test]
    fn budget_tracks_fps() {
        let config = Config {
            fps: 50,
            ..Config::default()
        };
        assert_eq!(config.frame_budget(), Duration::from_millis(20));
    }

    #[test]
    fn zero_fps_is_rejected() {
        let config = Config {
            fps: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFps));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let config = Config {
            height: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Area(AreaError::ZeroHeight))
        );
    }

    #[test]
    fn overfull_population_is_rejected() {
        let config = Config {
            width: 3,
            height: 3,
            population: 10,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PopulationTooLarge {
                requested: 10,
                cells: 9
            })
        );
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let config = Config {
            width: u16::MAX,
            height: u16::MAX,
            population: 1,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge {
                cells: 65_535 * 65_535,
                max: MAX_CELLS
            })
        );
    }

    #[test]
    fn grid_at_the_cap_is_allowed() {
        let config = Config {
            width: u16::MAX,
            height: 64,
            population: 1,
            ..Config::default()
        };
        assert_eq!(config.area().unwrap().cell_count(), MAX_CELLS);
        assert_eq!(config.validate(), Ok(()));

        let taller = Config {
            height: 65,
            ..config
        };
        assert!(matches!(
            taller.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn exactly_full_population_is_allowed() {
        let config = Config {
            width: 3,
            height: 3,
            population: 9,
            ..Config::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn threshold_above_eight_is_rejected() {
        let config = Config {
            threshold: 9,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdTooLarge { threshold: 9 })
        );
    }

    #[test]
    fn cull_policy_mirrors_fields() {
        let config = Config {
            threshold: 4,
            edges: EdgePolicy::Toroidal,
            ..Config::default()
        };
        assert_eq!(
            config.cull_policy(),
            CullPolicy {
                threshold: 4,
                edges: EdgePolicy::Toroidal
            }
        );
    }
}
