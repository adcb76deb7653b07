//! Line-oriented command interpreter
//!
//! Reads one command per line from any `BufRead` and writes plain-text
//! responses to any `Write`. Recoverable errors (bad score, unknown plate,
//! typos) are reported inline and the session carries on; only output
//! failures end it.

use crate::core::grid::Admission;
use crate::core::registry::Upsert;
use crate::error::RankError;
use crate::{Committed, Leaderboard, ParkingLot};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Shell errors
#[derive(Error, Debug)]
pub enum ShellError {
    /// Command word not recognised
    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    /// Right command, wrong arguments
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// Core operation failed
    #[error("{0}")]
    Rank(#[from] RankError),

    /// Writing a response failed
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

pub type ShellResult<T> = std::result::Result<T, ShellError>;

const HELP: &str = "\
Leaderboard:
  add <name> <score>   add a player or update their score
  remove <name>        remove a player
  find <name>          show a player's score
  top                  show the top players
  all                  show every player
Parking:
  park <plate>         park a vehicle (queued when full)
  retrieve <plate>     retrieve a vehicle
  slots                show every slot
  status               count free and occupied slots
  queue                show the waiting queue
  search <plate>       find a vehicle's slot
  history              show recently vacated slots
Other:
  help                 show this help
  quit                 save and exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { key: String, value: i64 },
    Remove(String),
    Find(String),
    Top,
    All,
    Park(String),
    Retrieve(String),
    Slots,
    Status,
    Queue,
    Search(String),
    History,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ShellError;

    fn from_str(line: &str) -> ShellResult<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        // Names may contain spaces, plates may not
        let name_arg = |usage: &'static str| -> ShellResult<String> {
            if rest.is_empty() {
                Err(ShellError::Usage(usage))
            } else {
                Ok(rest.to_string())
            }
        };
        let plate_arg = |usage: &'static str| -> ShellResult<String> {
            if rest.is_empty() || rest.contains(char::is_whitespace) {
                Err(ShellError::Usage(usage))
            } else {
                Ok(rest.to_string())
            }
        };
        let no_args = |cmd: Command| -> ShellResult<Command> {
            if rest.is_empty() {
                Ok(cmd)
            } else {
                Err(ShellError::Usage("this command takes no arguments"))
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "add" => {
                // The score is the last word; the name may contain spaces
                let (key, value) = rest
                    .rsplit_once(char::is_whitespace)
                    .ok_or(ShellError::Usage("add <name> <score>"))?;
                let value = value
                    .parse::<i64>()
                    .map_err(|_| ShellError::Usage("add <name> <score> (score is a whole number)"))?;
                Ok(Command::Add {
                    key: key.trim().to_string(),
                    value,
                })
            }
            "remove" => name_arg("remove <name>").map(Command::Remove),
            "find" => name_arg("find <name>").map(Command::Find),
            "top" => no_args(Command::Top),
            "all" => no_args(Command::All),
            "park" => plate_arg("park <plate>").map(Command::Park),
            "retrieve" => plate_arg("retrieve <plate>").map(Command::Retrieve),
            "slots" => no_args(Command::Slots),
            "status" => no_args(Command::Status),
            "queue" => no_args(Command::Queue),
            "search" => plate_arg("search <plate>").map(Command::Search),
            "history" => no_args(Command::History),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ShellError::UnknownCommand(other.to_string())),
        }
    }
}

/// Whether the session should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A leaderboard and a parking lot driven by text commands
#[derive(Debug)]
pub struct Session {
    board: Leaderboard,
    lot: ParkingLot,
}

impl Session {
    pub fn new(board: Leaderboard, lot: ParkingLot) -> Self {
        Session { board, lot }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    pub fn lot(&self) -> &ParkingLot {
        &self.lot
    }

    /// Process lines until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> ShellResult<()> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            debug!("Command: {}", trimmed);
            let result = trimmed
                .parse::<Command>()
                .and_then(|cmd| self.execute(cmd, out));

            match result {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(ShellError::Io(e)) => return Err(ShellError::Io(e)),
                Err(e) => writeln!(out, "Error: {}", e)?,
            }
        }
        Ok(())
    }

    /// Execute one command, writing its response to `out`
    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> ShellResult<Flow> {
        match cmd {
            Command::Add { key, value } => {
                let committed = self.board.add_or_update(&key, value)?;
                match committed.outcome {
                    Upsert::Inserted => writeln!(out, "Added {} with score {}.", key, value)?,
                    Upsert::Updated { previous } => {
                        writeln!(out, "Updated {}: {} -> {}.", key, previous, value)?
                    }
                    Upsert::Rejected { capacity } => writeln!(
                        out,
                        "Maximum players ({}) reached. Cannot add more players.",
                        capacity
                    )?,
                }
                report_persist(&committed, out)?;
            }
            Command::Remove(key) => {
                let committed = self.board.remove(&key);
                match &committed.outcome {
                    Some(entity) => writeln!(out, "Removed {}.", entity.key)?,
                    None => writeln!(out, "{} is not on the board.", key)?,
                }
                report_persist(&committed, out)?;
            }
            Command::Find(key) => match self.board.find(&key) {
                Some(entity) => writeln!(out, "{}", entity)?,
                None => writeln!(out, "{} is not on the board.", key)?,
            },
            Command::Top => {
                writeln!(out, "Top {} Players:", self.board.view().capacity())?;
                for (rank, entity) in self.board.top().enumerate() {
                    writeln!(out, "{}. {}", rank + 1, entity)?;
                }
            }
            Command::All => {
                writeln!(out, "All Players:")?;
                for (rank, entity) in self.board.all().enumerate() {
                    writeln!(out, "{}. {}", rank + 1, entity)?;
                }
            }
            Command::Park(key) => {
                let committed = self.lot.admit(&key)?;
                match committed.outcome {
                    Admission::Admitted { label } => writeln!(
                        out,
                        "Vehicle with plate number {} is parked at slot {}.",
                        key, label
                    )?,
                    Admission::Queued { position } => writeln!(
                        out,
                        "Parking lot is full. Vehicle with plate number {} added to the waiting queue at position {}.",
                        key, position
                    )?,
                    Admission::AlreadyAdmitted { label } => writeln!(
                        out,
                        "Vehicle with plate number {} is already parked at slot {}.",
                        key, label
                    )?,
                    Admission::AlreadyQueued { position } => writeln!(
                        out,
                        "Vehicle with plate number {} is already waiting at position {}.",
                        key, position
                    )?,
                }
                report_persist(&committed, out)?;
            }
            Command::Retrieve(key) => match self.lot.release(&key) {
                Ok(committed) => {
                    let release = &committed.outcome;
                    writeln!(
                        out,
                        "Vehicle with plate number {} retrieved from slot {}.",
                        release.key, release.label
                    )?;
                    if let Some(promoted) = &release.promoted {
                        writeln!(
                            out,
                            "Vehicle with plate number {} removed from the waiting queue and parked at slot {}.",
                            promoted.key, promoted.label
                        )?;
                    }
                    report_persist(&committed, out)?;
                }
                Err(RankError::NotFound(_)) => writeln!(
                    out,
                    "Vehicle with plate number {} not found in the parking lot.",
                    key
                )?,
                Err(e) => return Err(e.into()),
            },
            Command::Slots => {
                let grid = self.lot.grid();
                let cells: Vec<String> = grid
                    .slots()
                    .map(|(label, occupant)| format!("{} [{}]", label, occupant.unwrap_or("EMPTY")))
                    .collect();
                for row in cells.chunks(grid.cols()) {
                    writeln!(out, "{}", row.join(" "))?;
                }
            }
            Command::Status => {
                let grid = self.lot.grid();
                writeln!(out, "Available slots: {}", grid.available())?;
                writeln!(out, "Occupied slots: {}", grid.occupied())?;
            }
            Command::Queue => {
                let queue = self.lot.grid().queue();
                if queue.is_empty() {
                    writeln!(out, "The waiting queue is empty.")?;
                } else {
                    writeln!(out, "Waiting Queue:")?;
                    for (idx, key) in queue.iter().enumerate() {
                        writeln!(out, "{}. {}", idx + 1, key)?;
                    }
                    writeln!(out, "Total vehicles waiting: {}", queue.len())?;
                }
            }
            Command::Search(key) => match self.lot.find_slot(&key) {
                Some(label) => writeln!(out, "License plate {} is parked at slot {}.", key, label)?,
                None => writeln!(out, "License plate {} is not found in the parking lot.", key)?,
            },
            Command::History => {
                let history = self.lot.grid().history();
                if history.is_empty() {
                    writeln!(out, "No recently vacated spots.")?;
                } else {
                    writeln!(out, "Recently Vacated Spots:")?;
                    for (idx, label) in history.iter().enumerate() {
                        writeln!(out, "{}. {}", idx + 1, label)?;
                    }
                    writeln!(out, "Total recently vacated spots: {}", history.len())?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {
                if let Err(e) = self.board.save() {
                    writeln!(out, "Warning: could not save leaderboard: {}", e)?;
                }
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }
}

fn report_persist<T, W: Write>(committed: &Committed<T>, out: &mut W) -> io::Result<()> {
    match &committed.persist_error {
        Some(e) => writeln!(out, "Warning: change kept in memory but not saved: {}", e),
        None => Ok(()),
    }
}
