//! FIFO of keys waiting for a free slot

use std::collections::VecDeque;

/// Keys waiting for admission, oldest at the front
#[derive(Debug, Clone, Default)]
pub struct WaitQueue {
    keys: VecDeque<String>,
}

impl WaitQueue {
    pub fn new() -> Self {
        WaitQueue {
            keys: VecDeque::new(),
        }
    }

    /// Append a key at the back, returning its 1-based position
    pub fn enqueue(&mut self, key: impl Into<String>) -> usize {
        self.keys.push_back(key.into());
        self.keys.len()
    }

    /// Take the longest-waiting key; `None` when empty
    pub fn dequeue(&mut self) -> Option<String> {
        self.keys.pop_front()
    }

    pub fn front(&self) -> Option<&str> {
        self.keys.front().map(String::as_str)
    }

    /// 1-based position of a waiting key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key).map(|idx| idx + 1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Waiting keys, front first
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
