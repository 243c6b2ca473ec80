// SPDX-License-Identifier: MIT
//
// Area: grid dimensions and the linear index arithmetic built on them.
//
// Every plane in the framebuffer and every live cell in the population is
// addressed by a single row-major index, `row * width + column`. The Area
// is the only thing that knows how to go between that index and a
// (column, row) pair, so it is passed by reference to every operation
// that needs to reason about rows.
//
// Dimensions are `u16` because that's what the stored frame header can
// hold and what a terminal reports. Cell counts are `usize` because they
// index `Vec`s.

use std::fmt;

use thiserror::Error;

/// A row-major linear index in `[0, area.cell_count())`.
pub type Position = usize;

/// Rejected grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AreaError {
    #[error("grid width must be non-zero")]
    ZeroWidth,
    #[error("grid height must be non-zero")]
    ZeroHeight,
}

// ─── Area ───────────────────────────────────────────────────────────────────

/// Immutable grid dimensions in cells.
///
/// Both dimensions are guaranteed non-zero: the only way to get an `Area`
/// is through [`Area::new`].
///
/// # Examples
///
/// ```
/// use wither_term::area::Area;
///
/// let area = Area::new(140, 50).unwrap();
/// assert_eq!(area.cell_count(), 7000);
/// assert_eq!(area.index(3, 2), 283);
/// assert_eq!(area.coords(283), (3, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Area {
    width: u16,
    height: u16,
}

impl Area {
    /// Create an area, rejecting zero-sized dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`AreaError`] if either dimension is zero.
    pub const fn new(width: u16, height: u16) -> Result<Self, AreaError> {
        if width == 0 {
            return Err(AreaError::ZeroWidth);
        }
        if height == 0 {
            return Err(AreaError::ZeroHeight);
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn width(self) -> u16 {
        self.width
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn height(self) -> u16 {
        self.height
    }

    /// Total number of cells (`width × height`).
    #[inline]
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes needed to hold one bit per cell.
    #[inline]
    #[must_use]
    pub const fn mask_len(self) -> usize {
        self.cell_count().div_ceil(8)
    }

    /// Whether `pos` addresses a cell of this area.
    #[inline]
    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        pos < self.cell_count()
    }

    /// Linear index of `(x, y)`. The caller keeps `x < width`, `y < height`.
    #[inline]
    #[must_use]
    pub const fn index(self, x: u16, y: u16) -> Position {
        y as usize * self.width as usize + x as usize
    }

    /// Column and row of a linear index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // pos < cell_count keeps both parts within u16.
    pub const fn coords(self, pos: Position) -> (u16, u16) {
        let w = self.width as usize;
        ((pos % w) as u16, (pos / w) as u16)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
