// SPDX-License-Identifier: MIT
//
// Stored frames: the on-disk byte layout of a FrameBuffer.
//
//   offset  size              field
//   0       2                 width  (u16, little-endian)
//   2       2                 height (u16, little-endian)
//   4       w*h               color plane, one palette index per cell
//   4+w*h   w*h               glyph plane, one byte per cell
//   4+2wh   ceil(w*h / 8)     mask plane, LSB-first bit per cell
//
// Loading is all-or-nothing: every plane is read and validated into fresh
// storage before the live buffer is touched. A short read, a zero
// dimension, or a byte outside the palette/printable range leaves the
// buffer exactly as it was.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::area::{Area, AreaError};
use crate::buffer::{FrameBuffer, is_printable};
use crate::color::Color;
use crate::mask::MaskPlane;

/// Size of the width + height header in bytes.
pub const HEADER_LEN: usize = 4;

/// Why a stored frame could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source was unreadable or ended early.
    #[error("failed to read stored frame: {0}")]
    Io(#[from] io::Error),
    /// The header declared a zero width or height.
    #[error("stored frame has invalid dimensions: {0}")]
    Area(#[from] AreaError),
    /// A color byte outside the 8-color palette.
    #[error("stored frame cell {index} has color {value}, outside the 8-color palette")]
    InvalidColor { index: usize, value: u8 },
    /// A glyph byte that isn't printable ASCII.
    #[error("stored frame cell {index} has non-printable glyph {value:#04x}")]
    InvalidGlyph { index: usize, value: u8 },
}

/// Read exactly `len` bytes. Memory grows with the bytes actually read, so
/// a header promising more than the source holds fails without first
/// allocating the whole plane.
fn read_plane(r: &mut impl Read, len: usize) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    r.take(u64::try_from(len).unwrap_or(u64::MAX))
        .read_to_end(&mut bytes)?;
    if bytes.len() < len {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    Ok(bytes)
}

impl FrameBuffer {
    /// Decode a complete stored frame into a new buffer.
    ///
    /// # Errors
    ///
    /// See [`LoadError`]; a truncated source is [`LoadError::Io`] with
    /// [`io::ErrorKind::UnexpectedEof`].
    pub fn read_from(mut r: impl Read) -> Result<Self, LoadError> {
        let mut header = [0u8; HEADER_LEN];
        r.read_exact(&mut header)?;
        let width = u16::from_le_bytes([header[0], header[1]]);
        let height = u16::from_le_bytes([header[2], header[3]]);
        let area = Area::new(width, height)?;
        let size = area.cell_count();

        let colors = read_plane(&mut r, size)?
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Color::from_index(value).ok_or(LoadError::InvalidColor { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let glyphs = read_plane(&mut r, size)?;
        if let Some(index) = glyphs.iter().position(|&g| !is_printable(g)) {
            return Err(LoadError::InvalidGlyph {
                index,
                value: glyphs[index],
            });
        }

        let mask_bytes = read_plane(&mut r, area.mask_len())?;
        let mask = MaskPlane::from_bytes(size, mask_bytes)
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;

        debug!(%area, "decoded stored frame");
        Ok(Self::from_planes(area, glyphs, colors, mask))
    }

    /// Replace this buffer's Area and all three planes from a stored frame.
    ///
    /// On error the buffer is left untouched.
    ///
    /// # Errors
    ///
    /// See [`FrameBuffer::read_from`].
    pub fn load(&mut self, r: impl Read) -> Result<(), LoadError> {
        *self = Self::read_from(r)?;
        Ok(())
    }

    /// Decode a stored frame file into a new buffer.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be opened, or as
    /// [`read_from`](Self::read_from) does.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())?;
        let fb = Self::read_from(BufReader::new(file))?;
        debug!(path = %path.as_ref().display(), "loaded stored frame");
        Ok(fb)
    }

    /// [`load`](Self::load) from a file.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        *self = Self::open(path)?;
        Ok(())
    }

    /// Encode this buffer in the stored frame layout.
    ///
    /// # Errors
    ///
    /// Propagates errors from `w`.
    pub fn save(&self, mut w: impl Write) -> io::Result<()> {
        w.write_all(&self.to_bytes())?;
        w.flush()
    }

    /// [`save`](Self::save) to a file, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be created or written.
    pub fn save_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = File::create(path.as_ref())?;
        self.save(BufWriter::new(file))?;
        debug!(path = %path.as_ref().display(), "saved stored frame");
        Ok(())
    }

    /// The stored frame bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let area = self.area();
        let mut bytes = Vec::with_capacity(HEADER_LEN + 2 * area.cell_count() + area.mask_len());
        bytes.extend_from_slice(&area.width().to_le_bytes());
        bytes.extend_from_slice(&area.height().to_le_bytes());
        bytes.extend(self.colors().iter().map(|&c| u8::from(c)));
        bytes.extend_from_slice(self.glyphs());
        bytes.extend_from_slice(self.mask().as_bytes());
        bytes
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
