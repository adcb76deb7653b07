//! Score leaderboard: entity registry + top-K view + snapshot file

use crate::core::config::LeaderboardConfig;
use crate::core::registry::{Entity, EntityRegistry, SortedDescending, Upsert};
use crate::core::snapshot::{parse_leaderboard, render_leaderboard, SnapshotFile};
use crate::core::topk::TopKView;
use crate::core::validation::KeyKind;
use crate::error::Result;
use crate::Committed;
use tracing::{error, info, warn};

/// Demo roster added by [`Leaderboard::seed_defaults`]
pub const DEFAULT_ROSTER: [(&str, i64); 10] = [
    ("Kurt", 50),
    ("Jeff", 75),
    ("Nahida", 23),
    ("LinkinFork", 85),
    ("Eve", 37),
    ("WalterW", 92),
    ("MrBeast", 43),
    ("Batman", 69),
    ("Nuggies", 74),
    ("KSI", 49),
];

/// Ranked registry of players with a write-through snapshot
///
/// Every successful mutation recomputes the top-K view and, when a snapshot
/// file is configured, rewrites it before returning.
///
/// # Examples
///
/// ```
/// use rank_slot::{Leaderboard, LeaderboardConfig};
///
/// let mut board = Leaderboard::in_memory(&LeaderboardConfig::default());
/// board.add_or_update("Eve", 37).unwrap();
/// board.add_or_update("Eve", 99).unwrap();
///
/// assert_eq!(board.len(), 1);
/// assert_eq!(board.find("Eve").unwrap().value, 99);
/// ```
#[derive(Debug)]
pub struct Leaderboard {
    registry: EntityRegistry,
    top: TopKView,
    snapshot: Option<SnapshotFile>,
}

impl Leaderboard {
    /// Create an empty board that never touches disk
    pub fn in_memory(config: &LeaderboardConfig) -> Self {
        Leaderboard {
            registry: EntityRegistry::new(
                config.max_entities,
                config.value_range,
                KeyKind::Name,
            ),
            top: TopKView::new(config.top_k, config.strategy),
            snapshot: None,
        }
    }

    /// Open the board backed by `config.snapshot_path`
    ///
    /// An existing snapshot is reloaded; entries that no longer fit the
    /// configured range or capacity are skipped with a warning. Without a
    /// snapshot the board starts empty, or with [`DEFAULT_ROSTER`] when
    /// `seed_defaults` is set.
    pub fn open(config: &LeaderboardConfig) -> Result<Self> {
        let mut board = Self::in_memory(config);
        let file = SnapshotFile::new(&config.snapshot_path);

        match file.read()? {
            Some(text) => {
                let entities = parse_leaderboard(&text)?;
                for entity in &entities {
                    board.load_entity(entity);
                }
                info!(
                    "Loaded {} players from {:?}",
                    board.registry.len(),
                    file.path()
                );
            }
            None if config.seed_defaults => {
                for (name, score) in DEFAULT_ROSTER {
                    board.load_entity(&Entity::new(name, score));
                }
                info!("No leaderboard at {:?}, seeded demo roster", file.path());
            }
            None => info!("No leaderboard at {:?}, starting fresh", file.path()),
        }

        board.top.recompute(&board.registry);
        board.snapshot = Some(file);
        Ok(board)
    }

    /// Insert or overwrite one entry, skipping it with a warning if it
    /// doesn't fit. Returns whether a new key was inserted.
    fn load_entity(&mut self, entity: &Entity) -> bool {
        match self.registry.add_or_update(&entity.key, entity.value) {
            Ok(Upsert::Inserted) => true,
            Ok(Upsert::Updated { .. }) => false,
            Ok(Upsert::Rejected { .. }) => {
                warn!("Dropped {} on load: board full", entity.key);
                false
            }
            Err(e) => {
                warn!("Dropped {} on load: {}", entity.key, e);
                false
            }
        }
    }

    /// Add every entry of [`DEFAULT_ROSTER`]
    ///
    /// Entries outside the configured range, or arriving once the board is
    /// full, are skipped with a warning. Returns how many were inserted.
    pub fn seed_defaults(&mut self) -> Committed<usize> {
        let mut inserted = 0;
        for (name, score) in DEFAULT_ROSTER {
            if self.load_entity(&Entity::new(name, score)) {
                inserted += 1;
            }
        }
        self.commit(inserted)
    }

    /// Add a player or overwrite their score
    ///
    /// # Errors
    ///
    /// `InvalidValue` / `InvalidKey` from the registry; the board is unchanged.
    pub fn add_or_update(&mut self, key: &str, value: i64) -> Result<Committed<Upsert>> {
        let outcome = self.registry.add_or_update(key, value)?;
        if !outcome.is_mutation() {
            return Ok(Committed::clean(outcome));
        }
        Ok(self.commit(outcome))
    }

    /// Remove a player; absent keys are a no-op
    pub fn remove(&mut self, key: &str) -> Committed<Option<Entity>> {
        match self.registry.remove(key) {
            Some(entity) => self.commit(Some(entity)),
            None => Committed::clean(None),
        }
    }

    /// Write the snapshot now
    pub fn save(&self) -> Result<()> {
        match &self.snapshot {
            Some(file) => file.write(&render_leaderboard(self.registry.sorted_descending())),
            None => Ok(()),
        }
    }

    fn commit<T>(&mut self, outcome: T) -> Committed<T> {
        self.top.recompute(&self.registry);

        let persist_error = self.save().err();
        if let Some(e) = &persist_error {
            error!("Failed to save leaderboard: {}", e);
        }
        Committed {
            outcome,
            persist_error,
        }
    }

    pub fn find(&self, key: &str) -> Option<&Entity> {
        self.registry.find(key)
    }

    /// The top-K entries, best first
    pub fn top(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.top.entries()
    }

    /// Every player, best first
    pub fn all(&self) -> SortedDescending<'_> {
        self.registry.sorted_descending()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn view(&self) -> &TopKView {
        &self.top
    }

    pub fn snapshot(&self) -> Option<&SnapshotFile> {
        self.snapshot.as_ref()
    }
}
