//! Append-only audit trail for parking operations
//!
//! One free-text line per event, prefixed with an RFC 3339 timestamp. The
//! log is never read back by the crate; it only ever grows.

use crate::error::Result;
use crate::grid::SlotLabel;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A key took a slot
    Parked { label: SlotLabel },
    /// A key left its slot
    Retrieved { label: SlotLabel },
    /// A key joined the waiting queue
    Queued { position: usize },
}

/// Single audit log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub key: String,
    pub operation: Operation,
}

impl AuditEntry {
    /// Create a new audit entry with the current timestamp
    pub fn new(key: impl Into<String>, operation: Operation) -> Self {
        AuditEntry {
            timestamp: Utc::now(),
            key: key.into(),
            operation,
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        match &self.operation {
            Operation::Parked { label } => {
                write!(f, "{} Parked: {} at slot {}", ts, self.key, label)
            }
            Operation::Retrieved { label } => {
                write!(f, "{} Retrieved: {} from slot {}", ts, self.key, label)
            }
            Operation::Queued { position } => {
                write!(f, "{} Queued: {} at position {}", ts, self.key, position)
            }
        }
    }
}

/// File-backed audit log opened in append mode for every write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AuditLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append entries as one write
    pub fn append(&self, entries: &[AuditEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let text: String = entries.iter().map(|e| format!("{}\n", e)).collect();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
