// SPDX-License-Identifier: MIT
//
// FrameBuffer: three parallel planes that everything draws to.
//
// Every cell of the grid has a glyph, a palette color, and an active bit.
// Rather than one struct per cell, each attribute lives in its own plane:
//
//   glyphs  one printable ASCII byte per cell (default: space)
//   colors  one palette entry per cell (default: white)
//   mask    one bit per cell, packed eight to a byte (default: set)
//
// All three are indexed by the same row-major position and always sized to
// the same Area. Nothing outside this module can reach the plane storage
// mutably; the only way to change the Area is to replace every plane at
// once (see `stored.rs`).
//
// Rendering is a full repaint: clear, then walk the cells row by row,
// emitting a color escape only where the color changes from the previous
// cell. Large uniform regions cost one escape, not one per cell.

use std::io::{self, Write};

use unicode_segmentation::UnicodeSegmentation;

use crate::ansi::{self, Control};
use crate::area::{Area, AreaError, Position};
use crate::color::Color;
use crate::mask::MaskPlane;

/// Glyph used for blank cells.
pub const BLANK: u8 = b' ';

/// Glyph substituted for text that has no single-byte printable form.
pub const REPLACEMENT: u8 = b'?';

/// Whether `glyph` is a printable ASCII byte (space through tilde).
#[inline]
#[must_use]
pub const fn is_printable(glyph: u8) -> bool {
    matches!(glyph, 0x20..=0x7e)
}

bitflags::bitflags! {
    /// Selects which planes a whole-buffer operation touches.
    ///
    /// ```
    /// use wither_term::buffer::Planes;
    ///
    /// let planes = Planes::GLYPH | Planes::COLOR;
    /// assert!(planes.contains(Planes::GLYPH));
    /// assert!(!planes.contains(Planes::MASK));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Planes: u8 {
        const GLYPH = 1 << 0;
        const COLOR = 1 << 1;
        const MASK  = 1 << 2;
        const ALL   = Self::GLYPH.bits() | Self::COLOR.bits() | Self::MASK.bits();
    }
}

// ─── FrameBuffer ────────────────────────────────────────────────────────────

/// Glyph, color, and active-mask planes over one [`Area`].
///
/// Positions passed to point operations must lie in
/// `[0, area.cell_count())`; the caller knows the Area and validates.
///
/// # Examples
///
/// ```
/// use wither_term::area::Area;
/// use wither_term::buffer::FrameBuffer;
/// use wither_term::color::Color;
///
/// let area = Area::new(3, 2).unwrap();
/// let mut fb = FrameBuffer::new(area);
/// fb.set_glyph(4, b'x');
/// fb.set_color(4, Color::Green);
/// assert_eq!(fb.glyph(4), b'x');
/// assert_eq!(fb.color(4), Color::Green);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    area: Area,
    glyphs: Vec<u8>,
    colors: Vec<Color>,
    mask: MaskPlane,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Blank buffer: spaces, white, every cell active.
    #[must_use]
    pub fn new(area: Area) -> Self {
        Self::filled(area, Color::default(), BLANK, true)
    }

    /// Buffer with every cell set to the given color, glyph, and mask bit.
    #[must_use]
    pub fn filled(area: Area, color: Color, glyph: u8, active: bool) -> Self {
        let size = area.cell_count();
        Self {
            area,
            glyphs: vec![glyph; size],
            colors: vec![color; size],
            mask: MaskPlane::new(size, active),
        }
    }

    /// Single-row buffer holding `text`, one cell per grapheme cluster.
    ///
    /// Clusters that aren't a single printable ASCII byte are stored as `?`.
    /// Text longer than `u16::MAX` clusters is cut off.
    ///
    /// # Errors
    ///
    /// Returns [`AreaError::ZeroWidth`] for empty text.
    pub fn from_text(text: &str, color: Color, active: bool) -> Result<Self, AreaError> {
        let mut width: u16 = 0;
        let mut glyphs = Vec::new();
        for cluster in text.graphemes(true) {
            if width == u16::MAX {
                break;
            }
            glyphs.push(match cluster.as_bytes() {
                [b] if is_printable(*b) => *b,
                _ => REPLACEMENT,
            });
            width += 1;
        }

        let area = Area::new(width, 1)?;
        Ok(Self {
            area,
            colors: vec![color; glyphs.len()],
            mask: MaskPlane::new(glyphs.len(), active),
            glyphs,
        })
    }

    /// Assemble a buffer from planes that are already known to match `area`.
    pub(crate) fn from_planes(
        area: Area,
        glyphs: Vec<u8>,
        colors: Vec<Color>,
        mask: MaskPlane,
    ) -> Self {
        debug_assert_eq!(glyphs.len(), area.cell_count());
        debug_assert_eq!(colors.len(), area.cell_count());
        debug_assert_eq!(mask.len(), area.cell_count());
        Self {
            area,
            glyphs,
            colors,
            mask,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// The grid this buffer covers.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> Area {
        self.area
    }

    /// Glyph at `pos`.
    #[inline]
    #[must_use]
    pub fn glyph(&self, pos: Position) -> u8 {
        self.glyphs[pos]
    }

    /// Color at `pos`.
    #[inline]
    #[must_use]
    pub fn color(&self, pos: Position) -> Color {
        self.colors[pos]
    }

    /// Whether the cell at `pos` is active.
    #[inline]
    #[must_use]
    pub fn is_active(&self, pos: Position) -> bool {
        self.mask.get(pos)
    }

    /// The whole glyph plane.
    #[inline]
    #[must_use]
    pub fn glyphs(&self) -> &[u8] {
        &self.glyphs
    }

    /// The whole color plane.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The whole active-mask plane.
    #[inline]
    #[must_use]
    pub const fn mask(&self) -> &MaskPlane {
        &self.mask
    }

    // ─── Point Mutators ──────────────────────────────────────────────────

    /// Set the glyph at `pos`.
    #[inline]
    pub fn set_glyph(&mut self, pos: Position, glyph: u8) {
        debug_assert!(is_printable(glyph), "non-printable glyph {glyph:#04x}");
        self.glyphs[pos] = glyph;
    }

    /// Set the color at `pos`.
    #[inline]
    pub fn set_color(&mut self, pos: Position, color: Color) {
        self.colors[pos] = color;
    }

    /// Set or clear the active bit at `pos`.
    #[inline]
    pub fn set_active(&mut self, pos: Position, active: bool) {
        self.mask.set(pos, active);
    }

    // ─── Plane-wide Mutators ─────────────────────────────────────────────

    /// Set every glyph.
    pub fn fill_glyph(&mut self, glyph: u8) {
        debug_assert!(is_printable(glyph), "non-printable glyph {glyph:#04x}");
        self.glyphs.fill(glyph);
    }

    /// Set every color.
    pub fn fill_color(&mut self, color: Color) {
        self.colors.fill(color);
    }

    /// Mark every cell active.
    pub fn set_all_active(&mut self) {
        self.mask.set_all();
    }

    /// Mark every cell inactive.
    pub fn clear_all_active(&mut self) {
        self.mask.clear_all();
    }

    /// Flip every cell's active bit.
    pub fn invert_active(&mut self) {
        self.mask.invert();
    }

    /// Restore the selected planes to their blank defaults.
    pub fn reset(&mut self, planes: Planes) {
        if planes.contains(Planes::GLYPH) {
            self.fill_glyph(BLANK);
        }
        if planes.contains(Planes::COLOR) {
            self.fill_color(Color::default());
        }
        if planes.contains(Planes::MASK) {
            self.set_all_active();
        }
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Write one complete frame.
    ///
    /// Clears the screen and homes the cursor, then emits the cells in
    /// row-major order with a newline between rows. A color escape is
    /// written only when a cell's color differs from the previous cell's.
    /// The frame ends with an attribute reset. The active mask is not
    /// consulted: inactive cells are drawn like any other.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        ansi::write_all(out, &[Control::ClearScreen, Control::Home])?;

        let width = usize::from(self.area.width());
        let mut prev: Option<Color> = None;

        for (i, (&glyph, &color)) in self.glyphs.iter().zip(&self.colors).enumerate() {
            if prev != Some(color) {
                ansi::fg(out, color)?;
                prev = Some(color);
            }
            if i != 0 && i % width == 0 {
                out.write_all(b"\n")?;
            }
            out.write_all(&[glyph])?;
        }

        Control::Reset.write_to(out)?;
        out.write_all(b"\n")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
