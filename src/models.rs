//! Value types shared by the planner, the executor and the CLI.
//!
//! Every type here is an immutable value: a planning run produces fresh
//! entries and stats, and an execution run produces a fresh operation log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Whether an enumerated item is a regular file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
}

impl ItemKind {
    /// Returns the lowercase label used in tables and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::File => "file",
            ItemKind::Folder => "folder",
        }
    }
}

/// Outcome of planning for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Target is free; the rename will be applied.
    Ready,
    /// Target collides with another planned target or an existing path.
    Conflict,
    /// The computed name is structurally illegal.
    Invalid,
}

impl EntryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Ready => "ready",
            EntryStatus::Conflict => "conflict",
            EntryStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The text transformation applied to each name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameMode {
    /// Literal substring replacement.
    #[default]
    Replace,
    /// Shell-style glob match; `*` in the replacement stands for the stem.
    Wildcard,
    /// Regular-expression search and replace.
    Regex,
}

impl fmt::Display for RenameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenameMode::Replace => "replace",
            RenameMode::Wildcard => "wildcard",
            RenameMode::Regex => "regex",
        };
        f.write_str(name)
    }
}

impl FromStr for RenameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(RenameMode::Replace),
            "wildcard" => Ok(RenameMode::Wildcard),
            "regex" => Ok(RenameMode::Regex),
            other => Err(format!(
                "unknown mode '{}': expected replace, wildcard or regex",
                other
            )),
        }
    }
}

/// One planned rename, as shown to the caller.
///
/// `raw_new_path` is the result of substituting the name in place, while
/// `final_new_path` is where the item ends up once every renamed ancestor
/// folder has been renamed too. For folders the two are always equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewEntry {
    pub kind: ItemKind,
    pub old_path: PathBuf,
    pub raw_new_path: PathBuf,
    pub final_new_path: PathBuf,
    pub status: EntryStatus,
    /// Reason for a conflict or invalid status; empty when ready.
    pub message: String,
}

impl PreviewEntry {
    pub fn is_ready(&self) -> bool {
        self.status == EntryStatus::Ready
    }
}

/// Aggregate counts over one planning run.
///
/// `total_items` counts every enumerated item, including the ones whose name
/// does not change and therefore never appear as entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreviewStats {
    pub total_items: usize,
    pub ready: usize,
    pub conflicts: usize,
    pub invalid: usize,
}

impl PreviewStats {
    /// Stats for a run that enumerated `total_items` items and classified none yet.
    pub fn with_total(total_items: usize) -> Self {
        Self {
            total_items,
            ..Self::default()
        }
    }

    /// Returns a copy with the counter for `status` bumped by one.
    pub fn counted(self, status: EntryStatus) -> Self {
        match status {
            EntryStatus::Ready => Self {
                ready: self.ready + 1,
                ..self
            },
            EntryStatus::Conflict => Self {
                conflicts: self.conflicts + 1,
                ..self
            },
            EntryStatus::Invalid => Self {
                invalid: self.invalid + 1,
                ..self
            },
        }
    }

    /// Number of enumerated items left untouched by the rule.
    pub fn unchanged(&self) -> usize {
        self.total_items
            .saturating_sub(self.ready + self.conflicts + self.invalid)
    }
}

/// The result of one planning run.
///
/// An empty `entries` list with non-zero stats means the run was cancelled
/// or nothing matched; callers treat a cancelled run as superseded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreviewPlan {
    pub entries: Vec<PreviewEntry>,
    pub stats: PreviewStats,
}

impl PreviewPlan {
    /// Entries that will be applied, in plan order.
    pub fn ready_entries(&self) -> Vec<PreviewEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_ready())
            .cloned()
            .collect()
    }

    /// Looks up the entry planned for `old_path`.
    pub fn entry_for(&self, old_path: &Path) -> Option<&PreviewEntry> {
        self.entries.iter().find(|entry| entry.old_path == old_path)
    }
}

/// One committed filesystem rename, kept as an undo log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOperation {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// Everything needed to describe one planning run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRequest {
    pub root_directory: PathBuf,
    pub recursive: bool,
    pub include_files: bool,
    pub include_folders: bool,
    pub mode: RenameMode,
    pub pattern: String,
    pub replacement: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_counted_does_not_touch_other_counters() {
        let stats = PreviewStats::with_total(5)
            .counted(EntryStatus::Ready)
            .counted(EntryStatus::Conflict)
            .counted(EntryStatus::Conflict);

        assert_eq!(stats.total_items, 5);
        assert_eq!(stats.ready, 1);
        assert_eq!(stats.conflicts, 2);
        assert_eq!(stats.invalid, 0);
        assert_eq!(stats.unchanged(), 2);
    }

    #[test]
    fn test_request_value_equality() {
        let request = PreviewRequest {
            root_directory: PathBuf::from("/data"),
            recursive: true,
            include_files: true,
            include_folders: false,
            mode: RenameMode::Wildcard,
            pattern: "*.txt".to_string(),
            replacement: "*_old".to_string(),
        };

        assert_eq!(request.clone(), request);
        assert_ne!(
            PreviewRequest {
                recursive: false,
                ..request.clone()
            },
            request
        );
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        let json = serde_json::to_string(&RenameMode::Wildcard).unwrap();
        assert_eq!(json, "\"wildcard\"");
        assert_eq!(RenameMode::Regex.to_string(), "regex");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Replace".parse::<RenameMode>(), Ok(RenameMode::Replace));
        assert_eq!("regex".parse::<RenameMode>(), Ok(RenameMode::Regex));
        assert!("rename".parse::<RenameMode>().is_err());
    }
}
