// SPDX-License-Identifier: MIT
//
// Bit-packed active mask: one bit per cell, eight cells per byte.
//
// Bit `pos % 8` of byte `pos / 8` belongs to cell `pos` (LSB first). The
// trailing bits of the last byte have no cell; whole-plane operations
// write them along with everything else so the byte image round-trips
// through a stored frame unchanged.

/// A bit-packed boolean plane sized to a cell count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPlane {
    len: usize,
    bytes: Vec<u8>,
}

impl MaskPlane {
    /// A plane of `len` cells, every bit set or every bit clear.
    #[must_use]
    pub fn new(len: usize, active: bool) -> Self {
        let fill = if active { 0xff } else { 0x00 };
        Self {
            len,
            bytes: vec![fill; len.div_ceil(8)],
        }
    }

    /// Wrap raw bytes read from a stored frame.
    ///
    /// Returns `None` if `bytes` isn't exactly `ceil(len / 8)` long.
    #[must_use]
    pub fn from_bytes(len: usize, bytes: Vec<u8>) -> Option<Self> {
        (bytes.len() == len.div_ceil(8)).then_some(Self { len, bytes })
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the plane covers no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packed bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read one cell's bit.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "mask position {pos} out of {}", self.len);
        self.bytes[pos / 8] & (1 << (pos % 8)) != 0
    }

    /// Write one cell's bit.
    #[inline]
    pub fn set(&mut self, pos: usize, active: bool) {
        debug_assert!(pos < self.len, "mask position {pos} out of {}", self.len);
        let bit = 1 << (pos % 8);
        if active {
            self.bytes[pos / 8] |= bit;
        } else {
            self.bytes[pos / 8] &= !bit;
        }
    }

    /// Set every bit.
    pub fn set_all(&mut self) {
        self.bytes.fill(0xff);
    }

    /// Clear every bit.
    pub fn clear_all(&mut self) {
        self.bytes.fill(0x00);
    }

    /// Flip every bit.
    pub fn invert(&mut self) {
        for byte in &mut self.bytes {
            *byte = !*byte;
        }
    }

    /// Number of cells whose bit is set.
    #[must_use]
    pub fn count_active(&self) -> usize {
        (0..self.len).filter(|&pos| self.get(pos)).count()
    }
}
