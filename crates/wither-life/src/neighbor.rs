// SPDX-License-Identifier: MIT
//
// Neighbor counting over linear positions.
//
// A cell's eight neighbors are the positions one column and/or one row
// away. On a row-major grid those are the linear offsets
//
//   p-w-1  p-w  p-w+1
//   p-1     p   p+1
//   p+w-1  p+w  p+w+1
//
// The raw offsets don't know where a row ends: from the first column,
// `p-1` is the last cell of the previous row. How that edge is treated is
// a named policy rather than an accident of arithmetic.

use std::fmt;
use std::str::FromStr;

use wither_term::{Area, Position};

use crate::population::Population;

/// The eight `(dx, dy)` neighbor directions, top row first.
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// How neighbor probes behave at the grid's edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgePolicy {
    /// Probes that would leave the grid through any edge find nothing.
    #[default]
    Clipped,
    /// Raw linear offsets. Probes past a row end land on the adjacent row;
    /// probes past the top or bottom find nothing.
    Linear,
    /// Both axes wrap around. A probe that wraps back onto the cell itself
    /// (grids under three cells wide or tall) finds nothing.
    Toroidal,
}

impl EdgePolicy {
    /// Every policy, for CLI help and tests.
    pub const ALL: [Self; 3] = [Self::Clipped, Self::Linear, Self::Toroidal];

    /// Lowercase name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clipped => "clipped",
            Self::Linear => "linear",
            Self::Toroidal => "toroidal",
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown edge policy `{s}` (expected clipped, linear, or toroidal)"))
    }
}

/// Count the live cells among the eight neighbors of `pos`.
///
/// Always in `0..=8`. `pos` itself need not be alive.
#[must_use]
pub fn neighbor_count(pop: &Population, area: Area, pos: Position, edges: EdgePolicy) -> u8 {
    let mut count = 0;
    for (dx, dy) in DIRECTIONS {
        let probe = match edges {
            EdgePolicy::Linear => linear_probe(area, pos, dx, dy),
            EdgePolicy::Clipped => clipped_probe(area, pos, dx, dy),
            EdgePolicy::Toroidal => toroidal_probe(area, pos, dx, dy),
        };
        if probe.is_some_and(|q| pop.contains(q)) {
            count += 1;
        }
    }
    count
}

/// `pos + dy*width + dx`, or `None` if that falls below zero.
fn linear_probe(area: Area, pos: Position, dx: i8, dy: i8) -> Option<Position> {
    let width = isize::try_from(area.width()).ok()?;
    pos.checked_add_signed(isize::from(dy) * width + isize::from(dx))
}

fn clipped_probe(area: Area, pos: Position, dx: i8, dy: i8) -> Option<Position> {
    let (x, y) = area.coords(pos);
    let nx = x.checked_add_signed(i16::from(dx))?;
    let ny = y.checked_add_signed(i16::from(dy))?;
    (nx < area.width() && ny < area.height()).then(|| area.index(nx, ny))
}

fn toroidal_probe(area: Area, pos: Position, dx: i8, dy: i8) -> Option<Position> {
    let (x, y) = area.coords(pos);
    let nx = (i32::from(x) + i32::from(dx)).rem_euclid(i32::from(area.width()));
    let ny = (i32::from(y) + i32::from(dy)).rem_euclid(i32::from(area.height()));
    // rem_euclid by a positive u16 yields a value in 0..u16::MAX.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let q = area.index(nx as u16, ny as u16);
    (q != pos).then_some(q)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn area(w: u16, h: u16) -> Area {
        Area::new(w, h).unwrap()
    }

    fn full(area: Area) -> Population {
        (0..area.cell_count()).collect()
    }

    // ── Isolated and surrounded cells ─────────────────────────────────

    #[test]
    fn isolated_center_has_no_neighbors() {
        let a = area(3, 3);
        let pop: Population = [4].into_iter().collect();
        for edges in EdgePolicy::ALL {
            assert_eq!(neighbor_count(&pop, a, 4, edges), 0, "{edges}");
        }
    }

    #[test]
    fn full_grid_center_has_eight() {
        let a = area(3, 3);
        let pop = full(a);
        for edges in EdgePolicy::ALL {
            assert_eq!(neighbor_count(&pop, a, 4, edges), 8, "{edges}");
        }
    }

    // ── Corner of a full 3×3 grid ─────────────────────────────────────

    #[test]
    fn full_grid_corner_clipped() {
        let a = area(3, 3);
        assert_eq!(neighbor_count(&full(a), a, 0, EdgePolicy::Clipped), 3);
    }

    #[test]
    fn full_grid_corner_linear_counts_row_wrap() {
        // 1, 3, 4, plus p+w-1 = 2 at the far end of the same row.
        let a = area(3, 3);
        assert_eq!(neighbor_count(&full(a), a, 0, EdgePolicy::Linear), 4);
    }

    #[test]
    fn full_grid_corner_toroidal() {
        let a = area(3, 3);
        assert_eq!(neighbor_count(&full(a), a, 0, EdgePolicy::Toroidal), 8);
    }

    // ── Single row ────────────────────────────────────────────────────

    #[test]
    fn single_row_clipped() {
        let a = area(5, 1);
        let pop = full(a);
        assert_eq!(neighbor_count(&pop, a, 0, EdgePolicy::Clipped), 1);
        assert_eq!(neighbor_count(&pop, a, 2, EdgePolicy::Clipped), 2);
        assert_eq!(neighbor_count(&pop, a, 4, EdgePolicy::Clipped), 1);
    }

    #[test]
    fn single_row_linear() {
        let a = area(5, 1);
        let pop = full(a);
        // 1, plus p+w-1 = 4.
        assert_eq!(neighbor_count(&pop, a, 0, EdgePolicy::Linear), 2);
        // 3, plus p-w+1 = 0.
        assert_eq!(neighbor_count(&pop, a, 4, EdgePolicy::Linear), 2);
        assert_eq!(neighbor_count(&pop, a, 2, EdgePolicy::Linear), 2);
    }

    #[test]
    fn single_row_toroidal_counts_each_wrapped_offset() {
        // Rows above and below wrap onto the row itself: 4 and 1 three times each.
        let a = area(5, 1);
        assert_eq!(neighbor_count(&full(a), a, 0, EdgePolicy::Toroidal), 6);
    }

    // ── Edge positions ────────────────────────────────────────────────

    #[test]
    fn clipped_ignores_previous_row_end() {
        // 4×3: position 4 starts row 1; position 3 ends row 0.
        let a = area(4, 3);
        let pop: Population = [3].into_iter().collect();
        assert_eq!(neighbor_count(&pop, a, 4, EdgePolicy::Clipped), 0);
        assert_eq!(neighbor_count(&pop, a, 4, EdgePolicy::Linear), 1);
        assert_eq!(neighbor_count(&pop, a, 4, EdgePolicy::Toroidal), 1);
    }

    #[test]
    fn count_is_bounded_everywhere() {
        let a = area(4, 3);
        let pop = full(a);
        for edges in EdgePolicy::ALL {
            for pos in 0..a.cell_count() {
                assert!(neighbor_count(&pop, a, pos, edges) <= 8);
            }
        }
    }

    #[test]
    fn dead_cell_still_counts_neighbors() {
        let a = area(3, 3);
        let pop: Population = [0, 1, 2].into_iter().collect();
        assert_eq!(neighbor_count(&pop, a, 4, EdgePolicy::Clipped), 3);
    }

    // ── Parsing ───────────────────────────────────────────────────────

    #[test]
    fn policy_parses_by_name() {
        for edges in EdgePolicy::ALL {
            assert_eq!(edges.name().parse::<EdgePolicy>(), Ok(edges));
        }
        assert_eq!("TOROIDAL".parse::<EdgePolicy>(), Ok(EdgePolicy::Toroidal));
        assert!("wrap".parse::<EdgePolicy>().is_err());
    }

    #[test]
    fn default_policy_is_clipped() {
        assert_eq!(EdgePolicy::default(), EdgePolicy::Clipped);
    }
}
