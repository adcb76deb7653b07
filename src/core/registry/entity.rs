//! Registry records and their value bounds

use crate::error::{RankError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single registry record: unique key plus a bounded numeric value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identity (player name, plate number)
    pub key: String,
    /// Ranking value (e.g. a score)
    pub value: i64,
}

impl Entity {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Entity {
            key: key.into(),
            value,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.key, self.value)
    }
}

/// Inclusive range of accepted entity values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: i64,
    pub max: i64,
}

impl ValueRange {
    /// Scores accepted by the leaderboard
    pub const SCORE: ValueRange = ValueRange { min: 0, max: 100 };

    /// Create a new range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `min > max`.
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(RankError::InvalidConfig(format!(
                "value range is empty: min {} > max {}",
                min, max
            )));
        }
        Ok(ValueRange { min, max })
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Check a value, producing `InvalidValue` when out of range
    pub fn check(&self, value: i64) -> Result<i64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(RankError::InvalidValue {
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        ValueRange::SCORE
    }
}
