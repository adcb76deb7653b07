//! # rank-slot - Ranked Registries and Slot Grids
//!
//! `rank-slot` keeps small sets of ranked entities in memory with plain-text,
//! write-through persistence:
//!
//! - **Leaderboard**: a capped registry of players with an always-correct
//!   top-K view, saved as `"<rank>. <name> - <score>"` lines
//! - **Parking lot**: a fixed slot grid with a FIFO wait queue for overflow,
//!   a LIFO history of vacated slots, an occupancy snapshot and an
//!   append-only audit log
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rank_slot::{Config, Leaderboard, ParkingLot, Result};
//!
//! # fn main() -> Result<()> {
//! let config = Config::default();
//!
//! let mut board = Leaderboard::open(&config.leaderboard)?;
//! board.add_or_update("Eve", 37)?;
//! for (rank, player) in board.top().enumerate() {
//!     println!("{}. {}", rank + 1, player);
//! }
//!
//! let mut lot = ParkingLot::open(&config.parking)?;
//! lot.admit("ABC-123")?;
//! lot.release("ABC-123")?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod leaderboard;
pub mod parking;
pub mod shell;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{
    audit, config, error, grid, history, queue, registry, snapshot, topk, validation,
};

pub use crate::core::{
    config::{Config, LeaderboardConfig, ParkingConfig},
    error::{RankError, Result},
    grid::{Admission, Promotion, Release, ResourceGrid, SlotLabel},
    history::HistoryStack,
    queue::WaitQueue,
    registry::{Entity, EntityRegistry, Upsert, ValueRange},
    topk::{RecomputeStrategy, TopKView},
    validation::KeyKind,
};
pub use leaderboard::Leaderboard;
pub use parking::ParkingLot;

/// Result of a mutating facade call
///
/// The in-memory change has already happened. `persist_error` reports a
/// failure to write the snapshot or audit log; memory stays authoritative
/// and the next successful write catches the files up.
#[derive(Debug)]
pub struct Committed<T> {
    pub outcome: T,
    pub persist_error: Option<RankError>,
}

impl<T> Committed<T> {
    /// An outcome that required no persistence
    pub(crate) fn clean(outcome: T) -> Self {
        Committed {
            outcome,
            persist_error: None,
        }
    }

    /// Whether everything reached disk
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn into_outcome(self) -> T {
        self.outcome
    }
}
