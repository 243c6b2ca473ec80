// SPDX-License-Identifier: MIT
//
// wither: a decaying cellular automaton in the terminal.
//
// This is the main binary that wires together the two crates:
//
//   wither-term → framebuffer, ANSI rendering, stored frames, terminal session
//   wither-life → population, neighbor counts, culling, run state
//
// A run goes:
//
//   CLI flags → Config → validate → spawn → Session::acquire
//   FrameLoop: poll key → cull → draw → render → stdout → sleep
//   extinct / keypress / limit → Session::release → exit 0
//
// The terminal is restored on every exit path: explicitly after the loop,
// by Session's Drop on an early error, and by the panic hook otherwise.

mod frame_loop;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wither_life::config::{DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_POPULATION, DEFAULT_WIDTH};
use wither_life::cull::DEFAULT_THRESHOLD;
use wither_life::rng::seeded;
use wither_life::{Config, EdgePolicy, Simulation};
use wither_term::FrameBuffer;
use wither_term::terminal::{self, Session};

use crate::frame_loop::{FrameLoop, Pacer};

// ─── CLI ─────────────────────────────────────────────────────────────────────

/// Watch a random population wither away. Press any key to stop.
#[derive(Debug, Parser)]
#[command(name = "wither", version, about)]
struct Cli {
    /// Target generations per second.
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Grid columns.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u16,

    /// Grid rows.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u16,

    /// Live cells at generation zero.
    #[arg(long, default_value_t = DEFAULT_POPULATION)]
    population: usize,

    /// Cells with this many live neighbors or fewer die.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Edge handling for neighbor counts: clipped, linear, or toroidal.
    #[arg(long, default_value_t = EdgePolicy::default())]
    edges: EdgePolicy,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many generations even if cells remain.
    #[arg(long)]
    generations: Option<u64>,

    /// Stored frame drawn underneath the cells. Its size overrides
    /// --width and --height.
    #[arg(long, value_name = "FILE")]
    backdrop: Option<PathBuf>,

    /// Write logs here instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            fps: self.fps,
            width: self.width,
            height: self.height,
            population: self.population,
            threshold: self.threshold,
            edges: self.edges,
            seed: self.seed,
        }
    }
}

// ─── Logging ─────────────────────────────────────────────────────────────────

/// Install the global subscriber. `RUST_LOG` wins over the defaults: `info`
/// into a log file, `warn` to stderr (which shares the screen with frames).
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let fallback = if log_file.is_some() { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
    } else {
        let _ = builder.with_writer(io::stderr).try_init();
    }
    Ok(())
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = cli.config();

    let backdrop = match &cli.backdrop {
        Some(path) => {
            let frame = FrameBuffer::open(path)
                .with_context(|| format!("failed to load backdrop {}", path.display()))?;
            let area = frame.area();
            if (area.width(), area.height()) != (config.width, config.height) {
                info!(%area, "grid sized to backdrop");
            }
            config.width = area.width();
            config.height = area.height();
            Some(frame)
        }
        None => None,
    };

    config.validate().context("invalid configuration")?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, edges = %config.edges, threshold = config.threshold, "starting run");
    let mut rng = seeded(seed);

    let sim = Simulation::from_config(&config, &mut rng)?;
    let grid = sim.area();
    let frame = backdrop.unwrap_or_else(|| FrameBuffer::new(grid));
    let pacer = Pacer::new(config.frame_budget());
    let mut frames = FrameLoop::new(sim, frame, pacer, rng).with_limit(cli.generations);

    if let Some(screen) = terminal::window_size() {
        if grid.width() > screen.width() || grid.height() >= screen.height() {
            warn!(%grid, %screen, "grid is larger than the terminal; frames will wrap or scroll");
        }
    }

    let mut session = Session::acquire().context("failed to set up the terminal")?;
    let result = {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        frames.run(&mut session, &mut lock)
    };
    if let Err(e) = session.release() {
        warn!(error = %e, "terminal restore failed");
    }

    let outcome = result.context("frame loop failed")?;
    info!(
        state = ?outcome.state,
        generations = outcome.generations,
        survivors = outcome.survivors,
        "run finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_config_defaults() {
        let cli = Cli::parse_from(["wither"]);
        assert_eq!(cli.config(), Config::default());
        assert_eq!(cli.generations, None);
        assert_eq!(cli.backdrop, None);
    }

    #[test]
    fn flags_reach_the_config() {
        let cli = Cli::parse_from([
            "wither",
            "--fps",
            "30",
            "--width",
            "20",
            "--height",
            "8",
            "--population",
            "40",
            "--threshold",
            "3",
            "--edges",
            "toroidal",
            "--seed",
            "7",
        ]);
        assert_eq!(
            cli.config(),
            Config {
                fps: 30,
                width: 20,
                height: 8,
                population: 40,
                threshold: 3,
                edges: EdgePolicy::Toroidal,
                seed: Some(7),
            }
        );
    }

    #[test]
    fn unknown_edge_policy_is_rejected() {
        assert!(Cli::try_parse_from(["wither", "--edges", "mobius"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
