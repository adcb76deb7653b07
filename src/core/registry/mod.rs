//! Entity registry
//!
//! The registry owns every known entity. Entities live in an arena (a `Vec`
//! in registry order) with a hash index from key to arena slot for O(1)
//! lookup. Registry order is insertion order; updates happen in place and
//! removals keep the relative order of the remaining entities, so ties in
//! the sorted views are always broken the same way.

mod entity;

pub use entity::{Entity, ValueRange};

use crate::error::Result;
use crate::validation::KeyKind;
use ahash::AHashMap;
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Outcome of [`EntityRegistry::add_or_update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new entity was created
    Inserted,
    /// An existing entity's value was overwritten
    Updated { previous: i64 },
    /// The key was new but the registry is at capacity; nothing changed
    Rejected { capacity: usize },
}

impl Upsert {
    /// Whether the registry was changed
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Upsert::Rejected { .. })
    }
}

/// Bounded, key-unique collection of entities
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    /// Entities in registry order
    entities: Vec<Entity>,
    /// Key -> position in `entities`
    index: AHashMap<String, usize>,
    /// Maximum number of entities (inserts beyond this are rejected)
    capacity: usize,
    /// Accepted values
    range: ValueRange,
    /// Key validation rules
    key_kind: KeyKind,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new(capacity: usize, range: ValueRange, key_kind: KeyKind) -> Self {
        EntityRegistry {
            entities: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
            capacity,
            range,
            key_kind,
        }
    }

    /// Add a new entity or overwrite the value of an existing one
    ///
    /// The value is range-checked before anything else; an out-of-range value
    /// leaves the registry untouched. A new key arriving while the registry is
    /// full is rejected with a warning rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for out-of-range values and `InvalidKey` for
    /// keys that fail validation.
    pub fn add_or_update(&mut self, key: &str, value: i64) -> Result<Upsert> {
        self.range.check(value)?;
        let key = self.key_kind.normalize(key)?;

        if let Some(&idx) = self.index.get(&key) {
            let entity = &mut self.entities[idx];
            let previous = entity.value;
            entity.value = value;
            debug!("Updated {}: {} -> {}", key, previous, value);
            return Ok(Upsert::Updated { previous });
        }

        if self.entities.len() >= self.capacity {
            warn!(
                "Maximum entities ({}) reached, cannot add {}",
                self.capacity, key
            );
            return Ok(Upsert::Rejected {
                capacity: self.capacity,
            });
        }

        debug!("Inserted {} with value {}", key, value);
        self.index.insert(key.clone(), self.entities.len());
        self.entities.push(Entity { key, value });
        Ok(Upsert::Inserted)
    }

    /// Look up an entity by key
    pub fn find(&self, key: &str) -> Option<&Entity> {
        self.index
            .get(key.trim())
            .map(|&idx| &self.entities[idx])
    }

    /// Remove an entity, returning it if it was present
    pub fn remove(&mut self, key: &str) -> Option<Entity> {
        let idx = self.index.remove(key.trim())?;
        let entity = self.entities.remove(idx);

        // Everything after the removed slot shifted down by one
        for (pos, shifted) in self.entities.iter().enumerate().skip(idx) {
            self.index.insert(shifted.key.clone(), pos);
        }

        debug!("Removed {}", entity.key);
        Some(entity)
    }

    /// Entities ordered by value, highest first
    ///
    /// Ties keep registry order. Each call starts a fresh traversal.
    pub fn sorted_descending(&self) -> SortedDescending<'_> {
        let mut order: Vec<usize> = (0..self.entities.len()).collect();
        // `sort_by_key` is stable
        order.sort_by_key(|&idx| Reverse(self.entities[idx].value));

        SortedDescending {
            entities: &self.entities,
            order: order.into_iter(),
        }
    }

    /// Entities in registry order
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn value_range(&self) -> ValueRange {
        self.range
    }

    pub fn key_kind(&self) -> KeyKind {
        self.key_kind
    }
}

/// Iterator returned by [`EntityRegistry::sorted_descending`]
#[derive(Debug, Clone)]
pub struct SortedDescending<'a> {
    entities: &'a [Entity],
    order: std::vec::IntoIter<usize>,
}

impl<'a> Iterator for SortedDescending<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.order.next().map(|idx| &self.entities[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl ExactSizeIterator for SortedDescending<'_> {}
