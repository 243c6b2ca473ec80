// SPDX-License-Identifier: MIT
//
// Population: the sparse set of live cells.
//
// Only live cells are stored, as linear positions in a hash set, so a
// neighbor probe is a constant-time membership test regardless of grid
// size. The set is only ever shrunk after it's spawned: the engine has no
// birth step.

use std::collections::HashSet;
use std::collections::hash_set;

use wither_term::Position;

/// A set of live cell positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
    cells: HashSet<Position>,
}

impl Population {
    /// An empty population.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty population with room for `capacity` cells.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashSet::with_capacity(capacity),
        }
    }

    /// Number of live cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether every cell is dead.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `pos` is alive.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Mark `pos` alive. Returns `false` if it already was.
    pub fn insert(&mut self, pos: Position) -> bool {
        self.cells.insert(pos)
    }

    /// Remove every position in `doomed`. Returns how many were alive.
    pub fn remove_all(&mut self, doomed: &Self) -> usize {
        doomed.iter().filter(|&pos| self.cells.remove(&pos)).count()
    }

    /// Live positions in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    /// Live positions in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Vec<Position> {
        let mut cells: Vec<Position> = self.iter().collect();
        cells.sort_unstable();
        cells
    }
}

impl FromIterator<Position> for Population {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<Position> for Population {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Position;
    type IntoIter = hash_set::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
