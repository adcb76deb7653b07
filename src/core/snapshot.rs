//! Plain-text state snapshots
//!
//! Two line formats, one fact per line:
//! - leaderboard: `"<rank>. <key> - <value>"`, highest value first
//! - occupancy: `"<key> at slot <label>"`, row-major
//!
//! Snapshots are rewritten in full on every mutation. Writes go to a sibling
//! `.tmp` file that is then renamed over the target, so a crash mid-write
//! leaves the previous snapshot intact.

use crate::error::{RankError, Result};
use crate::grid::SlotLabel;
use crate::registry::Entity;
use regex::Regex;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Separator between key and label in occupancy lines
pub const AT_SLOT: &str = " at slot ";

/// Leaderboard line pattern; the key runs up to the last `" - "`
const RANK_LINE_PATTERN: &str = r"^(\d+)\. (.+) - (-?\d+)$";

/// A snapshot file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the snapshot contents
    pub fn write(&self, contents: &str) -> Result<()> {
        let mut tmp_name = OsString::from(self.path.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!("Wrote snapshot {:?} ({} bytes)", self.path, contents.len());
        Ok(())
    }

    /// Read the snapshot, or `None` if it does not exist yet
    ///
    /// Invalid UTF-8 is replaced with U+FFFD; the affected lines then fail
    /// to parse and are skipped like any other malformed line.
    pub fn read(&self) -> Result<Option<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) => {
                    warn!("Snapshot {:?} is not valid UTF-8, decoding lossily", self.path);
                    Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Render ranked entities, rank numbers starting at 1
pub fn render_leaderboard<'a, I>(entities: I) -> String
where
    I: IntoIterator<Item = &'a Entity>,
{
    entities
        .into_iter()
        .enumerate()
        .map(|(idx, entity)| format!("{}. {} - {}\n", idx + 1, entity.key, entity.value))
        .collect()
}

/// Parse leaderboard lines back into entities, in file order
///
/// Lines that don't look like ranked entries (banners, blank lines) are
/// skipped.
pub fn parse_leaderboard(text: &str) -> Result<Vec<Entity>> {
    let re = Regex::new(RANK_LINE_PATTERN)
        .map_err(|e| RankError::InvalidConfig(format!("rank line pattern: {}", e)))?;

    let mut entities = Vec::new();
    for line in text.lines() {
        let Some(caps) = re.captures(line.trim_end()) else {
            if !line.trim().is_empty() {
                debug!("Skipping non-entry line {:?}", line);
            }
            continue;
        };

        match caps[3].parse::<i64>() {
            Ok(value) => entities.push(Entity::new(&caps[2], value)),
            Err(e) => warn!("Skipping line {:?}: bad value: {}", line, e),
        }
    }
    Ok(entities)
}

/// Render occupied slots as `"<key> at slot <label>"` lines
pub fn render_occupancy<'a, I>(slots: I) -> String
where
    I: IntoIterator<Item = (SlotLabel, Option<&'a str>)>,
{
    slots
        .into_iter()
        .filter_map(|(label, occupant)| occupant.map(|key| format!("{}{}{}\n", key, AT_SLOT, label)))
        .collect()
}

/// Parse occupancy lines into `(key, label)` pairs
///
/// The key is everything before the first `" at slot "`, the label everything
/// after it. Malformed lines are skipped with a warning.
pub fn parse_occupancy(text: &str) -> Vec<(String, SlotLabel)> {
    let mut parsed = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let Some((key, label)) = line.split_once(AT_SLOT) else {
            warn!("Skipping occupancy line without slot: {:?}", line);
            continue;
        };

        match label.parse::<SlotLabel>() {
            Ok(label) => parsed.push((key.to_string(), label)),
            Err(e) => warn!("Skipping occupancy line {:?}: {}", line, e),
        }
    }
    parsed
}
