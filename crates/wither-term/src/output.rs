// SPDX-License-Identifier: MIT
//
// Frame staging.
//
// `FrameBuffer::render` emits one glyph byte at a time with escapes mixed
// in. Sent straight to stdout that would be thousands of small writes, and
// the terminal would paint a half-finished frame. Rendering goes into an
// OutputBuffer instead, and the finished frame is handed to the terminal
// with one `write_all`.

use std::io::{self, Write};

/// Room for a 140×50 frame with a color change on every cell.
const FRAME_CAPACITY: usize = 140 * 50 * 6;

/// In-memory staging area for one rendered frame.
///
/// Reused across frames; draining keeps the allocation.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    staged: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            staged: Vec::with_capacity(FRAME_CAPACITY),
        }
    }

    /// Bytes waiting to be sent.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.staged
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Send everything staged to `sink` in one write, flush the sink, and
    /// empty the buffer. Nothing is written when the buffer is empty.
    ///
    /// On error the staged bytes are kept.
    ///
    /// # Errors
    ///
    /// Propagates errors from `sink`.
    pub fn flush_to(&mut self, sink: &mut impl Write) -> io::Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        sink.write_all(&self.staged)?;
        sink.flush()?;
        self.staged.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.staged.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Staging only; see [`OutputBuffer::flush_to`].
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Accepts a fixed number of writes, then fails.
    struct Flaky(usize);

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.0 == 0 {
                return Err(io::Error::other("sink closed"));
            }
            self.0 -= 1;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_are_staged_in_order() {
        let mut out = OutputBuffer::new();
        write!(out, "\x1b[{}m", 31).unwrap();
        out.write_all(b"x").unwrap();
        assert_eq!(out.as_bytes(), b"\x1b[31mx");
    }

    #[test]
    fn flush_to_hands_over_and_empties() {
        let mut out = OutputBuffer::new();
        out.write_all(b"frame one").unwrap();
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"frame one");
        assert!(out.is_empty());

        out.write_all(b"two").unwrap();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"frame onetwo");
    }

    #[test]
    fn empty_flush_touches_nothing() {
        let mut out = OutputBuffer::new();
        out.flush_to(&mut Flaky(0)).unwrap();
    }

    #[test]
    fn failed_flush_keeps_the_frame() {
        let mut out = OutputBuffer::new();
        out.write_all(b"frame").unwrap();
        assert!(out.flush_to(&mut Flaky(0)).is_err());
        assert_eq!(out.as_bytes(), b"frame");
    }
}
