//! Fixed-capacity slot grid
//!
//! Slots are scanned in row-major order, so admission always takes the
//! lowest free label (`A1`, `A2`, ... `B1`, ...). When every slot is taken the
//! key joins the [`WaitQueue`]; releasing a slot records it on the
//! [`HistoryStack`] and immediately admits the longest-waiting key.
//!
//! Invariants:
//! - a key occupies at most one slot
//! - a waiting key is never also parked
//! - the occupancy log holds exactly the parked keys

mod label;
mod log;

pub use label::{SlotLabel, MAX_ROWS};
pub use log::{LogEntry, OccupancyLog};

use crate::error::{RankError, Result};
use crate::history::HistoryStack;
use crate::queue::WaitQueue;
use crate::validation::KeyKind;
use tracing::{debug, error, info, warn};

/// Outcome of [`ResourceGrid::admit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The key now occupies `label`
    Admitted { label: SlotLabel },
    /// The grid was full; the key waits at 1-based `position`
    Queued { position: usize },
    /// The key was already parked; nothing changed
    AlreadyAdmitted { label: SlotLabel },
    /// The key was already waiting; nothing changed
    AlreadyQueued { position: usize },
}

impl Admission {
    /// Whether the grid or queue was changed
    pub fn is_mutation(&self) -> bool {
        matches!(self, Admission::Admitted { .. } | Admission::Queued { .. })
    }
}

/// A waiting key moved into a freed slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub key: String,
    pub label: SlotLabel,
}

/// Outcome of [`ResourceGrid::release`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Key that left
    pub key: String,
    /// Slot it vacated
    pub label: SlotLabel,
    /// Queue front admitted as a consequence, if any
    pub promoted: Option<Promotion>,
}

/// R x C slot grid with its wait queue, release history and occupancy log
#[derive(Debug, Clone)]
pub struct ResourceGrid {
    rows: usize,
    cols: usize,
    /// Row-major occupants; `None` is an empty slot
    slots: Vec<Option<String>>,
    log: OccupancyLog,
    queue: WaitQueue,
    history: HistoryStack,
}

impl ResourceGrid {
    /// Create an empty grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `1 <= rows <= 26`, `cols >= 1` and the
    /// slot count fits in `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || rows > MAX_ROWS || cols == 0 {
            return Err(RankError::InvalidConfig(format!(
                "grid must have 1-{} rows and at least one column, got {}x{}",
                MAX_ROWS, rows, cols
            )));
        }
        let capacity = rows.checked_mul(cols).ok_or_else(|| {
            RankError::InvalidConfig(format!("grid {}x{} is too large", rows, cols))
        })?;

        Ok(ResourceGrid {
            rows,
            cols,
            slots: vec![None; capacity],
            log: OccupancyLog::new(),
            queue: WaitQueue::new(),
            history: HistoryStack::new(),
        })
    }

    /// Park a key in the first free slot, or queue it when the grid is full
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key is not a valid plate.
    pub fn admit(&mut self, key: &str) -> Result<Admission> {
        let key = KeyKind::Plate.normalize(key)?;

        if let Some(label) = self.log.find(&key) {
            return Ok(Admission::AlreadyAdmitted { label });
        }
        if let Some(position) = self.queue.position(&key) {
            return Ok(Admission::AlreadyQueued { position });
        }

        match self.slots.iter().position(Option::is_none) {
            Some(idx) => {
                let label = self.occupy(idx, key);
                Ok(Admission::Admitted { label })
            }
            None => {
                info!("Grid full, {} added to the waiting queue", key);
                let position = self.queue.enqueue(key);
                Ok(Admission::Queued { position })
            }
        }
    }

    /// Vacate the slot held by `key`
    ///
    /// The freed label is pushed onto the history stack. If anyone is
    /// waiting, the front of the queue is admitted straight away.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is not parked.
    pub fn release(&mut self, key: &str) -> Result<Release> {
        let key = key.trim();
        let idx = self
            .slots
            .iter()
            .position(|slot| slot.as_deref() == Some(key))
            .ok_or_else(|| RankError::NotFound(key.to_string()))?;

        let label = SlotLabel::from_index(idx, self.cols);
        let key = self.slots[idx].take().unwrap_or_else(|| key.to_string());
        self.log.remove(&key);
        self.history.push(label);
        debug!("Released {} from slot {}", key, label);

        // Queued keys were validated on the way in and a slot was just
        // freed, so promotion only fails if those invariants are broken
        let promoted = match self.queue.dequeue() {
            Some(next) => match self.admit(&next) {
                Ok(Admission::Admitted { label }) => {
                    info!("{} moved from the waiting queue to slot {}", next, label);
                    Some(Promotion { key: next, label })
                }
                Ok(other) => {
                    warn!("{} left the waiting queue but was not admitted: {:?}", next, other);
                    None
                }
                Err(e) => {
                    error!("Failed to promote {} from the waiting queue: {}", next, e);
                    None
                }
            },
            None => None,
        };

        Ok(Release {
            key,
            label,
            promoted,
        })
    }

    /// Put a key into a specific slot (used when restoring a snapshot)
    ///
    /// # Errors
    ///
    /// - `InvalidKey` for an invalid plate
    /// - `InvalidSlotLabel` if the label is outside this grid
    /// - `SlotOccupied` if someone else is already there
    /// - `DuplicateKey` if the key is parked elsewhere
    pub fn place(&mut self, key: &str, label: SlotLabel) -> Result<()> {
        let key = KeyKind::Plate.normalize(key)?;
        let idx = self.index_of(label)?;

        if let Some(occupant) = &self.slots[idx] {
            return Err(RankError::SlotOccupied {
                label: label.to_string(),
                occupant: occupant.clone(),
            });
        }
        if self.log.find(&key).is_some() {
            return Err(RankError::DuplicateKey(key));
        }

        self.occupy(idx, key);
        Ok(())
    }

    fn occupy(&mut self, idx: usize, key: String) -> SlotLabel {
        let label = SlotLabel::from_index(idx, self.cols);
        debug!("Parked {} at slot {}", key, label);
        self.log.record(key.clone(), label);
        self.slots[idx] = Some(key);
        label
    }

    fn index_of(&self, label: SlotLabel) -> Result<usize> {
        if label.row() >= self.rows || label.col() >= self.cols {
            return Err(RankError::InvalidSlotLabel(format!(
                "{} is outside the {}x{} grid",
                label, self.rows, self.cols
            )));
        }
        Ok(label.row() * self.cols + label.col())
    }

    /// True when no slot is empty
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Where a key is parked, via the occupancy log
    pub fn find_slot(&self, key: &str) -> Option<SlotLabel> {
        self.log.find(key.trim())
    }

    /// Who occupies a slot; `None` for empty or out-of-range labels
    pub fn occupant(&self, label: SlotLabel) -> Option<&str> {
        let idx = self.index_of(label).ok()?;
        self.slots[idx].as_deref()
    }

    /// Every slot in row-major order with its occupant
    pub fn slots(&self) -> impl Iterator<Item = (SlotLabel, Option<&str>)> + '_ {
        let cols = self.cols;
        self.slots
            .iter()
            .enumerate()
            .map(move |(idx, slot)| (SlotLabel::from_index(idx, cols), slot.as_deref()))
    }

    /// Number of empty slots
    pub fn available(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.capacity() - self.available()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn queue(&self) -> &WaitQueue {
        &self.queue
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Discard the most recent history entry
    pub fn pop_history(&mut self) -> Option<SlotLabel> {
        self.history.pop()
    }

    pub fn log(&self) -> &OccupancyLog {
        &self.log
    }
}
