// SPDX-License-Identifier: MIT
//
// The 8-color terminal palette.
//
// The framebuffer stores one palette index per cell. Indices map straight
// onto SGR 30–37, so a color change in the rendered frame is always a
// single short escape sequence.

use std::fmt;

/// One of the eight standard terminal foreground colors.
///
/// The discriminant is the palette index, which is also the byte written
/// to a stored frame's color plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    #[default]
    White = 7,
}

impl Color {
    /// Every palette entry in index order.
    pub const ALL: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// Look up a palette entry by index. `None` for indices ≥ 8.
    #[inline]
    #[must_use]
    pub const fn from_index(idx: u8) -> Option<Self> {
        if idx < 8 {
            Some(Self::ALL[idx as usize])
        } else {
            None
        }
    }

    /// The palette index (0–7).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// SGR foreground parameter (30–37).
    #[inline]
    #[must_use]
    pub const fn sgr_fg(self) -> u8 {
        30 + self as u8
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        color.index()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        };
        f.write_str(name)
    }
}
