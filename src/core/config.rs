//! Runtime configuration
//!
//! Loaded from a TOML file; every field has a default, so an empty file (or
//! no file at all) yields the stock setup: a top-10 board over at most 25
//! players scoring 0-100, and a 2x3 parking grid.
//!
//! ```toml
//! [leaderboard]
//! top_k = 10
//! max_entities = 25
//! value_range = { min = 0, max = 100 }
//! strategy = "incremental"
//! snapshot_path = "leaderboard.txt"
//!
//! [parking]
//! rows = 2
//! cols = 3
//! ```

use crate::error::{RankError, Result};
use crate::registry::ValueRange;
use crate::topk::RecomputeStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub leaderboard: LeaderboardConfig,

    #[validate(nested)]
    pub parking: ParkingConfig,
}

/// Score registry and top-K view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Size of the ranked view
    #[validate(range(min = 1, max = 1000))]
    pub top_k: usize,

    /// Registry capacity; new keys beyond it are rejected
    #[validate(range(min = 1, max = 100000))]
    pub max_entities: usize,

    pub value_range: ValueRange,

    pub strategy: RecomputeStrategy,

    pub snapshot_path: PathBuf,

    /// Add the demo roster when no snapshot exists
    pub seed_defaults: bool,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        LeaderboardConfig {
            top_k: 10,
            max_entities: 25,
            value_range: ValueRange::SCORE,
            strategy: RecomputeStrategy::default(),
            snapshot_path: PathBuf::from("leaderboard.txt"),
            seed_defaults: false,
        }
    }
}

/// Slot grid and parking persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ParkingConfig {
    /// Rows are lettered `A`-`Z`, so at most `grid::MAX_ROWS`
    #[validate(range(min = 1, max = 26))]
    pub rows: usize,

    #[validate(range(min = 1, max = 999))]
    pub cols: usize,

    /// Current occupancy, rewritten on every change
    pub snapshot_path: PathBuf,

    /// Append-only event log
    pub audit_log_path: PathBuf,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        ParkingConfig {
            rows: 2,
            cols: 3,
            snapshot_path: PathBuf::from("current_parked_vehicles.txt"),
            audit_log_path: PathBuf::from("parking_log.txt"),
        }
    }
}

impl Config {
    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Run field and cross-field validation
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| RankError::InvalidConfig(e.to_string()))?;

        let range = self.leaderboard.value_range;
        ValueRange::new(range.min, range.max)?;
        Ok(())
    }

    /// Resolve relative file paths against `dir`
    pub fn rebase(&mut self, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        for path in [
            &mut self.leaderboard.snapshot_path,
            &mut self.parking.snapshot_path,
            &mut self.parking.audit_log_path,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}
