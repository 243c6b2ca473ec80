// SPDX-License-Identifier: MIT
//
// wither-life: the population engine.
//
// A decaying cellular automaton: live cells are a sparse set of linear
// grid positions, each generation kills every cell with too few live
// neighbors, and nothing is ever born. The population only shrinks, so
// every run ends in extinction, a stable remnant, or an interrupt.
//
// The engine knows nothing about terminals. It borrows the grid geometry
// from wither-term and leaves drawing to whoever drives the generations.

pub mod config;
pub mod cull;
pub mod neighbor;
pub mod population;
pub mod rng;
pub mod sim;
pub mod spawn;

pub use config::{Config, ConfigError};
pub use cull::CullPolicy;
pub use neighbor::{EdgePolicy, neighbor_count};
pub use population::Population;
pub use sim::{Simulation, State};
pub use spawn::spawn;
