// SPDX-License-Identifier: MIT
//
// Terminal session: cbreak input, alternate screen, and restore on exit.
//
// Safety: termios, FIONREAD, TIOCGWINSZ, and isatty are only reachable
// through libc, so this module allows `unsafe`. Every unsafe block is a
// single FFI call on a standard fd with a pointer to a local.
#![allow(unsafe_code)]
//
// Input goes into cbreak mode, not raw mode: canonical line buffering and
// echo are off, so one keypress shows up in `key_pressed()` without Enter
// and isn't echoed over the frame, but output processing stays on and the
// bare `\n` between frame rows still returns the carriage.
//
// Three paths put the terminal back:
//
//   Session::release   the normal exit, after the last frame
//   Drop for Session   early returns and `?` on the way out of main
//   the panic hook     a panic mid-frame, possibly with stdout locked
//
// The panic hook can't see the Session, so the saved termios is also
// parked in a process-wide slot while cbreak mode is on.

use std::io::{self, Write};
use std::mem::MaybeUninit;
use std::sync::{Mutex, Once};

use tracing::{debug, warn};

use crate::ansi::{self, Control};
use crate::area::Area;

// ─── Queries ─────────────────────────────────────────────────────────────────

/// The terminal on stdout as a grid, or `None` if stdout isn't a terminal.
#[cfg(unix)]
#[must_use]
pub fn window_size() -> Option<Area> {
    let mut ws = MaybeUninit::<libc::winsize>::zeroed();
    if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, ws.as_mut_ptr()) } != 0 {
        return None;
    }
    let ws = unsafe { ws.assume_init() };
    Area::new(ws.ws_col, ws.ws_row).ok()
}

#[cfg(not(unix))]
#[must_use]
pub fn window_size() -> Option<Area> {
    None
}

/// Whether stdin is a terminal. Key polling only works when it is.
#[cfg(unix)]
#[must_use]
pub fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn stdin_is_tty() -> bool {
    false
}

// ─── Cbreak ──────────────────────────────────────────────────────────────────

/// Termios as it was before cbreak mode, for the panic hook.
#[cfg(unix)]
static PARKED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn park(termios: Option<libc::termios>) {
    if let Ok(mut slot) = PARKED_TERMIOS.lock() {
        *slot = termios;
    }
}

#[cfg(unix)]
fn set_termios(action: libc::c_int, termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, action, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Proof that stdin is in cbreak mode; holds the settings to go back to.
#[cfg(unix)]
struct Cbreak {
    saved: libc::termios,
}

#[cfg(unix)]
impl Cbreak {
    /// Switch stdin to cbreak mode. `None` when stdin isn't a terminal.
    fn enter() -> io::Result<Option<Self>> {
        if !stdin_is_tty() {
            return Ok(None);
        }

        let mut current = MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, current.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let saved = unsafe { current.assume_init() };

        let mut cbreak = saved;
        cbreak.c_lflag &= !(libc::ICANON | libc::ECHO);
        cbreak.c_cc[libc::VMIN] = 1;
        cbreak.c_cc[libc::VTIME] = 0;
        set_termios(libc::TCSANOW, &cbreak)?;

        park(Some(saved));
        Ok(Some(Self { saved }))
    }

    /// Restore the saved settings. TCSAFLUSH discards the keypress that
    /// ended the run so it doesn't reach the shell.
    fn leave(self) -> io::Result<()> {
        park(None);
        set_termios(libc::TCSAFLUSH, &self.saved)
    }
}

#[cfg(not(unix))]
struct Cbreak;

#[cfg(not(unix))]
impl Cbreak {
    fn enter() -> io::Result<Option<Self>> {
        Ok(None)
    }

    fn leave(self) -> io::Result<()> {
        Ok(())
    }
}

/// Bytes of input waiting on stdin.
#[cfg(unix)]
fn pending_input() -> io::Result<usize> {
    let mut waiting: libc::c_int = 0;
    if unsafe { libc::ioctl(libc::STDIN_FILENO, libc::FIONREAD, &raw mut waiting) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(usize::try_from(waiting).unwrap_or(0))
}

#[cfg(not(unix))]
fn pending_input() -> io::Result<usize> {
    Ok(0)
}

// ─── Panic hook ──────────────────────────────────────────────────────────────

static PANIC_HOOK: Once = Once::new();

/// Chain a hook that restores the terminal before the default panic
/// message prints. Installed once per process.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

/// Write the release sequences straight to fd 1 (the panicking thread may
/// hold the stdout lock) and put back any parked termios.
#[cfg(unix)]
fn restore_after_panic() {
    for control in Control::RELEASE {
        let bytes = control.as_bytes();
        unsafe {
            let _ = libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast(), bytes.len());
        }
    }
    if let Ok(slot) = PARKED_TERMIOS.lock() {
        if let Some(saved) = slot.as_ref() {
            let _ = set_termios(libc::TCSANOW, saved);
        }
    }
}

#[cfg(not(unix))]
fn restore_after_panic() {
    let _ = ansi::write_all(&mut io::stderr(), &Control::RELEASE);
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// The terminal, borrowed for the length of a run.
///
/// When stdin isn't a terminal the input side is skipped and
/// [`key_pressed`](Self::key_pressed) always answers `false`; the screen
/// side still switches.
///
/// ```no_run
/// use wither_term::terminal::Session;
///
/// let mut session = Session::acquire()?;
/// while !session.key_pressed()? {
///     // draw a frame
/// }
/// session.release()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Session {
    cbreak: Option<Cbreak>,
    /// The alternate screen is up and the cursor hidden.
    active: bool,
}

impl Session {
    /// Enter cbreak mode and the alternate screen, and hide the cursor.
    ///
    /// # Errors
    ///
    /// Fails if termios can't be changed or stdout can't be written.
    /// Whatever was already changed is put back.
    pub fn acquire() -> io::Result<Self> {
        install_panic_hook();

        let mut session = Self {
            cbreak: Cbreak::enter()?,
            active: false,
        };

        let mut stdout = io::stdout().lock();
        ansi::write_all(&mut stdout, &Control::ACQUIRE)?;
        stdout.flush()?;
        session.active = true;

        debug!(key_polling = session.cbreak.is_some(), "terminal acquired");
        Ok(session)
    }

    /// Whether the screen still needs restoring.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a key has been pressed and not yet read. Leaves the input
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns the OS error if stdin can't be queried.
    pub fn key_pressed(&self) -> io::Result<bool> {
        if self.cbreak.is_none() {
            return Ok(false);
        }
        Ok(pending_input()? > 0)
    }

    /// Put the terminal back. Safe to call more than once.
    ///
    /// Termios is restored even when the screen sequences fail to write.
    ///
    /// # Errors
    ///
    /// The first failure among writing to stdout and restoring termios.
    pub fn release(&mut self) -> io::Result<()> {
        let screen = if self.active {
            self.active = false;
            let mut stdout = io::stdout().lock();
            ansi::write_all(&mut stdout, &Control::RELEASE).and_then(|()| stdout.flush())
        } else {
            Ok(())
        };
        let input = self.cbreak.take().map_or(Ok(()), Cbreak::leave);

        debug!("terminal released");
        screen.and(input)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(%err, "terminal restore failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{MutexGuard, PoisonError};

    // Tests may run without a terminal attached; they check that nothing
    // fails, and the no-TTY behavior where it applies.

    /// Sessions share stdin, stdout, and the parked termios slot, so tests
    /// that open one take turns.
    static TERMINAL: Mutex<()> = Mutex::new(());

    fn exclusive() -> MutexGuard<'static, ()> {
        TERMINAL.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Queries ───────────────────────────────────────────────────────

    #[test]
    fn window_size_is_never_zero() {
        if let Some(area) = window_size() {
            assert!(area.cell_count() > 0);
        }
    }

    // ── Session ───────────────────────────────────────────────────────

    #[test]
    fn release_is_idempotent() {
        let _terminal = exclusive();
        let mut session = Session::acquire().unwrap();
        assert!(session.is_active());
        session.release().unwrap();
        assert!(!session.is_active());
        session.release().unwrap();
    }

    #[test]
    fn drop_restores_an_active_session() {
        let _terminal = exclusive();
        let session = Session::acquire().unwrap();
        drop(session);
    }

    #[test]
    fn no_tty_means_no_keypresses() {
        let _terminal = exclusive();
        let session = Session::acquire().unwrap();
        if !stdin_is_tty() {
            assert!(!session.key_pressed().unwrap());
        }
    }

    #[cfg(unix)]
    #[test]
    fn release_clears_the_parked_termios() {
        let _terminal = exclusive();
        let mut session = Session::acquire().unwrap();
        let parked = PARKED_TERMIOS.lock().unwrap().is_some();
        assert_eq!(parked, stdin_is_tty());
        session.release().unwrap();
        assert!(PARKED_TERMIOS.lock().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn back_to_back_sessions_leave_nothing_parked() {
        let _terminal = exclusive();
        for _ in 0..3 {
            let session = Session::acquire().unwrap();
            drop(session);
        }
        assert!(PARKED_TERMIOS.lock().unwrap().is_none());
    }

    // ── Panic hook ────────────────────────────────────────────────────

    #[test]
    fn panic_hook_installs_once() {
        install_panic_hook();
        install_panic_hook();
        assert!(PANIC_HOOK.is_completed());
    }
}
