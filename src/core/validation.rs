//! Validation for entity keys
//!
//! Keys end up verbatim in the text snapshots, so anything that would break
//! the one-fact-per-line formats is rejected up front:
//! - Player names: any printable text, trimmed, 1-64 characters
//! - Plate numbers: ASCII letters, digits and hyphens, 1-16 characters

use crate::error::{RankError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The flavour of key a registry or grid accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyKind {
    /// Free-form display name (leaderboard players)
    Name,
    /// Vehicle plate number (parking lot occupants)
    Plate,
}

impl KeyKind {
    /// Printable characters only, no line breaks
    const NAME_PATTERN: &'static str = r"^[^\p{Cc}]{1,64}$";

    /// Must start with a letter or digit
    const PLATE_PATTERN: &'static str = r"^[A-Za-z0-9][A-Za-z0-9-]{0,15}$";

    fn pattern(self) -> &'static str {
        match self {
            KeyKind::Name => Self::NAME_PATTERN,
            KeyKind::Plate => Self::PLATE_PATTERN,
        }
    }

    /// Validate a raw key and return its normalized form
    ///
    /// Surrounding whitespace is trimmed before matching.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the trimmed key does not match this kind's rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_slot::KeyKind;
    ///
    /// assert_eq!(KeyKind::Name.normalize("  Eve ").unwrap(), "Eve");
    /// assert!(KeyKind::Plate.normalize("AB 123").is_err());
    /// ```
    pub fn normalize(self, key: &str) -> Result<String> {
        let key = key.trim();

        if key.is_empty() {
            return Err(RankError::InvalidKey("key cannot be empty".to_string()));
        }

        let re = Regex::new(self.pattern())
            .map_err(|e| RankError::InvalidConfig(format!("key pattern: {}", e)))?;
        if !re.is_match(key) {
            let rule = match self {
                KeyKind::Name => "names must be 1-64 printable characters",
                KeyKind::Plate => {
                    "plates must be 1-16 letters, digits or hyphens, starting with a letter or digit"
                }
            };
            return Err(RankError::InvalidKey(format!("'{}': {}", key, rule)));
        }

        Ok(key.to_string())
    }
}
