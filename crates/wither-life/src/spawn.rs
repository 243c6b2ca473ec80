// SPDX-License-Identifier: MIT
//
// Spawner: the initial population.
//
// Every position starts in an identity list, the list is scrambled by
// swapping each index with a uniformly chosen index anywhere in the list,
// and the first N entries become the live cells. The swap partner may be
// the index itself or one already visited, which is a weaker shuffle than
// Fisher–Yates, but the positions are still distinct: they're a prefix of
// a permutation.

use rand::Rng;
use tracing::debug;
use wither_term::{Area, Position};

use crate::population::Population;

/// Spawn `count` distinct live cells over `area`.
///
/// Asking for more cells than the area holds yields every cell.
#[must_use]
pub fn spawn(area: Area, count: usize, rng: &mut impl Rng) -> Population {
    let cells = area.cell_count();
    let mut order: Vec<Position> = (0..cells).collect();
    for i in 0..cells {
        let j = rng.random_range(0..cells);
        order.swap(i, j);
    }

    let mut pop = Population::with_capacity(count.min(cells));
    pop.extend(order.into_iter().take(count));
    debug!(%area, requested = count, spawned = pop.len(), "spawned population");
    pop
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use pretty_assertions::assert_eq;

    fn area(w: u16, h: u16) -> Area {
        Area::new(w, h).unwrap()
    }

    #[test]
    fn spawns_exact_count_in_range() {
        let a = area(140, 50);
        let mut rng = seeded(1);
        let pop = spawn(a, 1000, &mut rng);
        assert_eq!(pop.len(), 1000);
        assert!(pop.iter().all(|pos| a.contains(pos)));
    }

    #[test]
    fn zero_is_empty() {
        let pop = spawn(area(3, 3), 0, &mut seeded(1));
        assert!(pop.is_empty());
    }

    #[test]
    fn full_count_is_every_cell() {
        let a = area(4, 3);
        let pop = spawn(a, a.cell_count(), &mut seeded(5));
        assert_eq!(pop.sorted(), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn over_request_is_clamped() {
        let a = area(2, 2);
        let pop = spawn(a, 100, &mut seeded(5));
        assert_eq!(pop.len(), 4);
    }

    #[test]
    fn every_count_is_exact() {
        let a = area(6, 5);
        let mut rng = seeded(11);
        for n in 0..=a.cell_count() + 3 {
            let pop = spawn(a, n, &mut rng);
            assert_eq!(pop.len(), n.min(a.cell_count()));
            assert!(pop.iter().all(|pos| a.contains(pos)));
        }
    }

    #[test]
    fn seeded_spawn_is_deterministic() {
        let a = area(30, 20);
        let first = spawn(a, 50, &mut seeded(1234));
        let second = spawn(a, 50, &mut seeded(1234));
        assert_eq!(first, second);
    }

    #[test]
    fn spawn_covers_the_grid() {
        // Over many seeds, every cell of a small grid gets picked at least once.
        let a = area(4, 4);
        let mut seen = Population::new();
        for seed in 0..200 {
            seen.extend(spawn(a, 2, &mut seeded(seed)).iter());
        }
        assert_eq!(seen.len(), 16);
    }
}
