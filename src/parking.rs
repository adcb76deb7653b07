//! Parking lot: slot grid + occupancy snapshot + audit trail

use crate::core::audit::{AuditEntry, AuditLog, Operation};
use crate::core::config::ParkingConfig;
use crate::core::grid::{Admission, Release, ResourceGrid, SlotLabel};
use crate::core::snapshot::{parse_occupancy, render_occupancy, SnapshotFile};
use crate::error::{RankError, Result};
use crate::Committed;
use tracing::{error, info, warn};

/// Slot grid with write-through persistence
///
/// After every change the current-occupancy snapshot is rewritten and one
/// line per event is appended to the audit log. The wait queue and release
/// history live in memory only.
///
/// # Examples
///
/// ```
/// use rank_slot::{Admission, ParkingConfig, ParkingLot};
///
/// let mut lot = ParkingLot::in_memory(&ParkingConfig::default()).unwrap();
/// let parked = lot.admit("ABC-123").unwrap();
/// assert!(matches!(parked.outcome, Admission::Admitted { .. }));
/// assert_eq!(lot.find_slot("ABC-123").unwrap().to_string(), "A1");
/// ```
#[derive(Debug)]
pub struct ParkingLot {
    grid: ResourceGrid,
    snapshot: Option<SnapshotFile>,
    audit: Option<AuditLog>,
}

impl ParkingLot {
    /// Create an empty lot that never touches disk
    pub fn in_memory(config: &ParkingConfig) -> Result<Self> {
        Ok(ParkingLot {
            grid: ResourceGrid::new(config.rows, config.cols)?,
            snapshot: None,
            audit: None,
        })
    }

    /// Open the lot, restoring occupancy from `config.snapshot_path`
    ///
    /// Lines that don't fit the configured grid (bad label, slot already
    /// taken, plate listed twice) are skipped with a warning.
    pub fn open(config: &ParkingConfig) -> Result<Self> {
        let mut lot = Self::in_memory(config)?;
        let file = SnapshotFile::new(&config.snapshot_path);

        match file.read()? {
            Some(text) => {
                for (key, label) in parse_occupancy(&text) {
                    if let Err(e) = lot.grid.place(&key, label) {
                        warn!("Skipping {} at slot {}: {}", key, label, e);
                    }
                }
                info!(
                    "Restored {} parked vehicles from {:?}",
                    lot.grid.occupied(),
                    file.path()
                );
            }
            None => info!("No previous parking data at {:?}, starting fresh", file.path()),
        }

        lot.snapshot = Some(file);
        lot.audit = Some(AuditLog::new(&config.audit_log_path));
        Ok(lot)
    }

    /// Park a vehicle, or queue it when the lot is full
    ///
    /// # Errors
    ///
    /// `InvalidKey` for a malformed plate.
    pub fn admit(&mut self, key: &str) -> Result<Committed<Admission>> {
        let outcome = self.grid.admit(key)?;
        let key = key.trim();

        let event = match outcome {
            Admission::Admitted { label } => Operation::Parked { label },
            Admission::Queued { position } => Operation::Queued { position },
            Admission::AlreadyAdmitted { .. } | Admission::AlreadyQueued { .. } => {
                return Ok(Committed::clean(outcome));
            }
        };

        let rewrite = matches!(outcome, Admission::Admitted { .. });
        Ok(self.commit(outcome, vec![AuditEntry::new(key, event)], rewrite))
    }

    /// Retrieve a vehicle; the queue front takes the freed slot
    ///
    /// # Errors
    ///
    /// `NotFound` if the plate is not parked.
    pub fn release(&mut self, key: &str) -> Result<Committed<Release>> {
        let outcome = self.grid.release(key)?;

        let mut events = vec![AuditEntry::new(
            outcome.key.clone(),
            Operation::Retrieved {
                label: outcome.label,
            },
        )];
        if let Some(promoted) = &outcome.promoted {
            events.push(AuditEntry::new(
                promoted.key.clone(),
                Operation::Parked {
                    label: promoted.label,
                },
            ));
        }

        Ok(self.commit(outcome, events, true))
    }

    /// Rewrite the occupancy snapshot now
    pub fn save(&self) -> Result<()> {
        match &self.snapshot {
            Some(file) => file.write(&render_occupancy(self.grid.slots())),
            None => Ok(()),
        }
    }

    fn commit<T>(&mut self, outcome: T, events: Vec<AuditEntry>, rewrite: bool) -> Committed<T> {
        let mut persist_error: Option<RankError> = None;

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.append(&events) {
                error!("Unable to write audit log {:?}: {}", audit.path(), e);
                persist_error = Some(e);
            }
        }

        if rewrite {
            if let Err(e) = self.save() {
                error!("Unable to write parking snapshot: {}", e);
                persist_error.get_or_insert(e);
            }
        }

        Committed {
            outcome,
            persist_error,
        }
    }

    pub fn find_slot(&self, key: &str) -> Option<SlotLabel> {
        self.grid.find_slot(key)
    }

    pub fn is_full(&self) -> bool {
        self.grid.is_full()
    }

    pub fn grid(&self) -> &ResourceGrid {
        &self.grid
    }

    /// Discard the most recent vacated-slot entry
    pub fn pop_history(&mut self) -> Option<SlotLabel> {
        self.grid.pop_history()
    }
}
