//! Bounded top-K view over an entity registry
//!
//! The view is a fixed array of `K` slots holding copies of the highest-value
//! entities, sorted descending. Slots past the last entity hold an empty
//! marker. It is a derived cache: the registry is always the source of truth
//! and the view is recomputed after every registry mutation.

use crate::registry::{Entity, EntityRegistry};
use serde::{Deserialize, Serialize};

/// How [`TopKView::recompute`] rebuilds the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecomputeStrategy {
    /// Stable sort of the whole registry, then copy the first K
    #[default]
    FullSort,
    /// Offer every entity, in registry order, to a bounded insertion array
    Incremental,
}

/// Fixed-capacity, descending view of the K best entities
#[derive(Debug, Clone)]
pub struct TopKView {
    /// Exactly K slots; `None` is the empty marker
    slots: Vec<Option<Entity>>,
    strategy: RecomputeStrategy,
}

impl TopKView {
    pub fn new(k: usize, strategy: RecomputeStrategy) -> Self {
        TopKView {
            slots: vec![None; k],
            strategy,
        }
    }

    /// Rebuild the view from the registry using the configured strategy
    pub fn recompute(&mut self, registry: &EntityRegistry) {
        match self.strategy {
            RecomputeStrategy::FullSort => self.recompute_sorted(registry),
            RecomputeStrategy::Incremental => self.recompute_incremental(registry),
        }
    }

    fn recompute_sorted(&mut self, registry: &EntityRegistry) {
        let mut best = registry.sorted_descending();
        for slot in self.slots.iter_mut() {
            *slot = best.next().cloned();
        }
    }

    fn recompute_incremental(&mut self, registry: &EntityRegistry) {
        self.clear();
        for entity in registry.iter() {
            self.offer(entity);
        }
    }

    /// Offer a single entity for insertion
    ///
    /// The entity lands in the first slot that is empty or whose occupant has
    /// a strictly lower value. Lower entries shift down by one and the last
    /// one falls off when the view is full. Returns the rank (0-based) the
    /// entity was placed at, or `None` if it did not make the cut.
    pub fn offer(&mut self, entity: &Entity) -> Option<usize> {
        let pos = self.slots.iter().position(|slot| match slot {
            None => true,
            Some(current) => entity.value > current.value,
        })?;

        // Rotating the tail right moves the last slot into `pos`
        self.slots[pos..].rotate_right(1);
        self.slots[pos] = Some(entity.clone());
        Some(pos)
    }

    /// Reset every slot to the empty marker
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Occupied entries in rank order
    pub fn entries(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// K, the number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn strategy(&self) -> RecomputeStrategy {
        self.strategy
    }
}
