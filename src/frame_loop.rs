// SPDX-License-Identifier: MIT
//
// Frame loop: one generation per tick, one frame per generation.
//
// Each generation:
//
//   1. poll for an interrupt (a keypress ends the run before any work)
//   2. blank every cell drawn last frame
//   3. cull the population
//   4. draw the survivors, each with a fresh random palette color
//   5. render the framebuffer and write it out in one go
//   6. sleep whatever is left of the frame budget
//
// A generation that overruns its budget simply doesn't sleep; the run
// degrades to whatever rate the work allows. The loop ends when the
// simulation goes extinct, is interrupted, or hits an optional
// generation limit.

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::trace;
use wither_life::{Simulation, State};
use wither_term::buffer::BLANK;
use wither_term::output::OutputBuffer;
use wither_term::terminal::Session;
use wither_term::{Color, FrameBuffer};

/// Glyph drawn for a live cell.
pub const LIVE: u8 = b'x';

// ─── Interrupt ───────────────────────────────────────────────────────────────

/// The boundary poll: "has the user asked to stop since the last check?"
pub trait Interrupt {
    /// Checked once at the top of every generation.
    ///
    /// # Errors
    ///
    /// Whatever the underlying source reports.
    fn poll(&mut self) -> io::Result<bool>;
}

impl Interrupt for Session {
    fn poll(&mut self) -> io::Result<bool> {
        self.key_pressed()
    }
}

// ─── Pacer ───────────────────────────────────────────────────────────────────

/// Fixed per-generation time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    budget: Duration,
}

impl Pacer {
    #[must_use]
    pub const fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// Time left to sleep after spending `elapsed`, or `None` on overrun.
    #[must_use]
    pub fn remaining(self, elapsed: Duration) -> Option<Duration> {
        self.budget
            .checked_sub(elapsed)
            .filter(|left| !left.is_zero())
    }

    /// Sleep out the rest of the budget for a generation begun at `start`.
    pub fn pace(self, start: Instant) {
        if let Some(left) = self.remaining(start.elapsed()) {
            thread::sleep(left);
        }
    }
}

// ─── FrameLoop ───────────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Final state. `Running` only when the generation limit was hit.
    pub state: State,
    /// Generations completed.
    pub generations: u64,
    /// Cells still alive.
    pub survivors: usize,
}

/// Drives a [`Simulation`] and paints it to a [`FrameBuffer`].
pub struct FrameLoop<R> {
    sim: Simulation,
    frame: FrameBuffer,
    out: OutputBuffer,
    pacer: Pacer,
    rng: R,
    limit: Option<u64>,
}

impl<R: Rng> FrameLoop<R> {
    /// Pair a simulation with a frame of the same Area.
    #[must_use]
    pub fn new(sim: Simulation, frame: FrameBuffer, pacer: Pacer, rng: R) -> Self {
        debug_assert_eq!(sim.area(), frame.area());
        Self {
            sim,
            frame,
            out: OutputBuffer::new(),
            pacer,
            rng,
            limit: None,
        }
    }

    /// Stop after `limit` generations even if cells remain.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// The frame as last drawn.
    #[must_use]
    pub const fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Run generations until the simulation finishes or the limit is hit,
    /// writing one frame per generation to `sink`.
    ///
    /// # Errors
    ///
    /// Propagates failures from `interrupt` and `sink`.
    pub fn run(&mut self, interrupt: &mut impl Interrupt, sink: &mut impl Write) -> io::Result<Outcome> {
        while !self.sim.state().is_finished() {
            if self.limit.is_some_and(|limit| self.sim.generation() >= limit) {
                break;
            }
            if interrupt.poll()? {
                self.sim.interrupt();
                break;
            }

            let start = Instant::now();
            self.generation(sink)?;
            trace!(elapsed = ?start.elapsed(), "frame written");
            self.pacer.pace(start);
        }

        Ok(Outcome {
            state: self.sim.state(),
            generations: self.sim.generation(),
            survivors: self.sim.population().len(),
        })
    }

    fn generation(&mut self, sink: &mut impl Write) -> io::Result<()> {
        for pos in self.sim.population().iter() {
            self.frame.set_glyph(pos, BLANK);
        }

        self.sim.step();

        for pos in self.sim.population().iter() {
            let color = Color::ALL[self.rng.random_range(0..Color::ALL.len())];
            self.frame.set_glyph(pos, LIVE);
            self.frame.set_color(pos, color);
        }

        self.frame.render(&mut self.out)?;
        self.out.flush_to(sink)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
