//! LIFO of recently vacated slots

use crate::grid::SlotLabel;

/// Freed slot labels, most recent on top
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    labels: Vec<SlotLabel>,
}

impl HistoryStack {
    pub fn new() -> Self {
        HistoryStack { labels: Vec::new() }
    }

    pub fn push(&mut self, label: SlotLabel) {
        self.labels.push(label);
    }

    /// Remove the most recent label; `None` when empty
    pub fn pop(&mut self) -> Option<SlotLabel> {
        self.labels.pop()
    }

    pub fn peek(&self) -> Option<SlotLabel> {
        self.labels.last().copied()
    }

    /// Labels from most to least recent
    pub fn iter(&self) -> impl Iterator<Item = SlotLabel> + '_ {
        self.labels.iter().rev().copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
