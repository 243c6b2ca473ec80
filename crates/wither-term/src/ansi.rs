// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// wither needs very little from the terminal: a frame clears and homes,
// switches among the eight basic foreground colors, and resets at the end;
// a session flips the alternate screen and the cursor. The fixed sequences
// are a `Control` enum so callers can batch them (`write_all` over a
// slice), and the one parameterized sequence, the foreground color, is a
// function.

use std::io::{self, Write};

use crate::color::Color;

/// A parameterless control sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// ED 2. Leaves the cursor where it was.
    ClearScreen,
    /// CUP with no parameters: row 1, column 1.
    Home,
    /// SGR 0.
    Reset,
    /// DECTCEM reset.
    HideCursor,
    /// DECTCEM set.
    ShowCursor,
    /// DECSET 1049: save the main screen and switch away from it.
    EnterAltScreen,
    /// DECRST 1049.
    ExitAltScreen,
}

impl Control {
    /// Sequences a session writes when it takes the terminal.
    pub const ACQUIRE: [Self; 3] = [Self::EnterAltScreen, Self::HideCursor, Self::ClearScreen];

    /// Sequences a session writes when it gives the terminal back. The
    /// alternate screen goes last so the shell reappears already reset.
    pub const RELEASE: [Self; 3] = [Self::Reset, Self::ShowCursor, Self::ExitAltScreen];

    /// The raw bytes.
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::ClearScreen => b"\x1b[2J",
            Self::Home => b"\x1b[H",
            Self::Reset => b"\x1b[0m",
            Self::HideCursor => b"\x1b[?25l",
            Self::ShowCursor => b"\x1b[?25h",
            Self::EnterAltScreen => b"\x1b[?1049h",
            Self::ExitAltScreen => b"\x1b[?1049l",
        }
    }

    /// Write this sequence.
    ///
    /// # Errors
    ///
    /// Propagates errors from `w`.
    #[inline]
    pub fn write_to(self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(self.as_bytes())
    }
}

/// Write every sequence in `seq`, in order.
///
/// # Errors
///
/// Stops at and returns the first error from `w`.
pub fn write_all(w: &mut impl Write, seq: &[Control]) -> io::Result<()> {
    seq.iter().try_for_each(|c| c.write_to(w))
}

/// Set the foreground to a palette color (SGR 30–37).
///
/// # Errors
///
/// Propagates errors from `w`.
#[inline]
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.sgr_fg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn written(seq: &[Control]) -> Vec<u8> {
        let mut out = Vec::new();
        write_all(&mut out, seq).unwrap();
        out
    }

    #[test]
    fn frame_prologue() {
        assert_eq!(
            written(&[Control::ClearScreen, Control::Home]),
            b"\x1b[2J\x1b[H"
        );
    }

    #[test]
    fn acquire_and_release_mirror_each_other() {
        assert_eq!(written(&Control::ACQUIRE), b"\x1b[?1049h\x1b[?25l\x1b[2J");
        assert_eq!(written(&Control::RELEASE), b"\x1b[0m\x1b[?25h\x1b[?1049l");
    }

    #[test]
    fn every_sequence_is_a_csi() {
        for c in [
            Control::ClearScreen,
            Control::Home,
            Control::Reset,
            Control::HideCursor,
            Control::ShowCursor,
            Control::EnterAltScreen,
            Control::ExitAltScreen,
        ] {
            assert!(c.as_bytes().starts_with(b"\x1b["), "{c:?}");
        }
    }

    #[test]
    fn fg_covers_the_palette() {
        let mut out = Vec::new();
        for color in Color::ALL {
            fg(&mut out, color).unwrap();
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[30m\x1b[31m\x1b[32m\x1b[33m\x1b[34m\x1b[35m\x1b[36m\x1b[37m"
        );
    }
}
