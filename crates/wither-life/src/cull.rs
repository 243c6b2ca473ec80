// SPDX-License-Identifier: MIT
//
// Culling: which live cells die this generation.
//
// Every live cell whose neighbor count is at or below the threshold dies.
// Counts for the whole population are taken against the same snapshot, so
// the order cells are visited in never matters and one cell's death can't
// change another's fate within a generation. Nothing is ever born.

use wither_term::Area;

use crate::neighbor::{EdgePolicy, neighbor_count};
use crate::population::Population;

/// Neighbor count at or below which a cell dies, unless configured.
pub const DEFAULT_THRESHOLD: u8 = 2;

/// The death rule: threshold plus the edge policy its counts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CullPolicy {
    /// Cells with this many live neighbors or fewer die.
    pub threshold: u8,
    /// How neighbor probes treat the grid's edges.
    pub edges: EdgePolicy,
}

impl Default for CullPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            edges: EdgePolicy::default(),
        }
    }
}

impl CullPolicy {
    /// The cells of `pop` that die this generation.
    ///
    /// Always a subset of `pop`. Does not modify `pop`.
    #[must_use]
    pub fn select(&self, pop: &Population, area: Area) -> Population {
        pop.iter()
            .filter(|&pos| neighbor_count(pop, area, pos, self.edges) <= self.threshold)
            .collect()
    }

    /// Select and remove this generation's dead. Returns them.
    pub fn apply(&self, pop: &mut Population, area: Area) -> Population {
        let doomed = self.select(pop, area);
        pop.remove_all(&doomed);
        doomed
    }
}
