//! rank-slot command shell
//!
//! Reads leaderboard and parking commands line by line from stdin (or a
//! script file) and answers on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use rank_slot::shell::Session;
use rank_slot::{Config, Leaderboard, ParkingLot};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rank-slot")]
#[command(about = "Leaderboard and parking lot tracker with plain-text persistence")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for snapshot and log files (relative paths resolve here)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Seed the demo roster when no leaderboard snapshot exists
    #[arg(long)]
    seed: bool,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::default(),
    };
    if args.seed {
        config.leaderboard.seed_defaults = true;
    }
    if let Some(dir) = &args.data_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating data dir {}", dir.display()))?;
        config.rebase(dir);
    }

    let board = Leaderboard::open(&config.leaderboard).context("opening leaderboard")?;
    let lot = ParkingLot::open(&config.parking).context("opening parking lot")?;
    info!(
        "Loaded {} players, {} parked vehicles",
        board.len(),
        lot.grid().occupied()
    );

    let mut session = Session::new(board, lot);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.script {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening script {}", path.display()))?;
            session.run(BufReader::new(file), &mut out)?;
        }
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprintln!("Type 'help' for commands, 'quit' to exit.");
            }
            session.run(stdin.lock(), &mut out)?;
        }
    }

    Ok(())
}
