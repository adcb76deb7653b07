//! Occupancy log: key -> slot label, newest first
//!
//! Mirrors the grid so a key can be located without scanning every slot.

use super::SlotLabel;

/// One logged admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub key: String,
    pub label: SlotLabel,
}

#[derive(Debug, Clone, Default)]
pub struct OccupancyLog {
    entries: Vec<LogEntry>,
}

impl OccupancyLog {
    pub fn new() -> Self {
        OccupancyLog {
            entries: Vec::new(),
        }
    }

    /// Record a key as parked at `label`
    pub fn record(&mut self, key: impl Into<String>, label: SlotLabel) {
        self.entries.insert(
            0,
            LogEntry {
                key: key.into(),
                label,
            },
        );
    }

    /// Drop a key's entry, returning the label it was logged at
    pub fn remove(&mut self, key: &str) -> Option<SlotLabel> {
        let idx = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(idx).label)
    }

    pub fn find(&self, key: &str) -> Option<SlotLabel> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.label)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
