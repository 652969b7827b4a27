/// Persisted history of the last applied rename batch.
///
/// The library itself keeps no state between calls. The command-line tool
/// runs once per invocation, so it stores the undo log of its last `apply`
/// next to the renamed tree and replays it on `undo`.
use crate::executor::{LogSink, UndoReport, undo_renames};
use crate::models::RenameOperation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the history file written into the root directory.
pub const HISTORY_FILE_NAME: &str = ".qxrename_history.json";

/// Errors that can occur while recording or replaying rename history.
#[derive(Debug)]
pub enum RenameError {
    /// The root directory path is invalid or doesn't exist.
    InvalidRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write history file.
    HistoryWriteFailed { source: std::io::Error },
    /// Failed to read history file.
    HistoryReadFailed { source: std::io::Error },
    /// History file has invalid format.
    InvalidHistoryFormat { reason: String },
    /// There is no recorded batch to undo.
    NoHistory { root: PathBuf },
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path, source } => {
                write!(f, "Invalid root directory {}: {}", path.display(), source)
            }
            Self::HistoryWriteFailed { source } => {
                write!(f, "Failed to write history file: {}", source)
            }
            Self::HistoryReadFailed { source } => {
                write!(f, "Failed to read history file: {}", source)
            }
            Self::InvalidHistoryFormat { reason } => {
                write!(f, "Invalid history file format: {}", reason)
            }
            Self::NoHistory { root } => {
                write!(f, "No previous rename found to undo in {}", root.display())
            }
        }
    }
}

impl std::error::Error for RenameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRoot { source, .. }
            | Self::HistoryWriteFailed { source }
            | Self::HistoryReadFailed { source } => Some(source),
            _ => None,
        }
    }
}

/// Result type for history operations.
pub type RenameResult<T> = Result<T, RenameError>;

/// The undo log of one applied batch, as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    /// RFC 3339 timestamp of when the batch was applied.
    pub timestamp: String,
    /// The root directory the batch was planned under.
    pub root: PathBuf,
    /// Applied renames, in application order.
    pub operations: Vec<RenameOperation>,
}

impl HistoryLog {
    /// Creates a log for a batch just applied under `root`.
    pub fn new(root: PathBuf, operations: Vec<RenameOperation>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root,
            operations,
        }
    }

    /// Returns the path to the history file for this root.
    pub fn history_file_path(root: &Path) -> PathBuf {
        root.join(HISTORY_FILE_NAME)
    }

    /// Saves this log to `<root>/.qxrename_history.json`, replacing any previous one.
    pub fn save(&self) -> RenameResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            RenameError::HistoryWriteFailed {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("JSON serialization failed: {}", e),
                ),
            }
        })?;

        fs::write(Self::history_file_path(&self.root), json)
            .map_err(|e| RenameError::HistoryWriteFailed { source: e })
    }

    /// Loads the most recent log for `root`, if there is one.
    pub fn load(root: &Path) -> RenameResult<Option<Self>> {
        let history_path = Self::history_file_path(root);

        if !history_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&history_path)
            .map_err(|e| RenameError::HistoryReadFailed { source: e })?;

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| RenameError::InvalidHistoryFormat {
                reason: format!("JSON parse error: {}", e),
            })
    }

    /// Deletes the history file for `root`, if present.
    pub fn delete(root: &Path) -> RenameResult<()> {
        let history_path = Self::history_file_path(root);
        if history_path.exists() {
            fs::remove_file(&history_path)
                .map_err(|e| RenameError::HistoryWriteFailed { source: e })?;
        }
        Ok(())
    }
}

/// Replays recorded history to revert the last applied batch.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the last batch applied under `root`.
    ///
    /// Operations are replayed newest first so the tree is restored exactly.
    /// The history file is removed only when every operation was restored;
    /// otherwise it is kept so the user can fix the problem and retry.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist, or if there is no readable
    /// history for it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use qxrename::history::UndoManager;
    /// use std::path::Path;
    ///
    /// let report = UndoManager::undo(Path::new("/path/to/directory"), &mut |line: &str| {
    ///     println!("{}", line)
    /// });
    /// match report {
    ///     Ok(report) => println!("Restored {} entries", report.restored),
    ///     Err(e) => eprintln!("Undo failed: {}", e),
    /// }
    /// ```
    pub fn undo(root: &Path, log: &mut impl LogSink) -> RenameResult<UndoReport> {
        if !root.is_dir() {
            return Err(RenameError::InvalidRoot {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "root directory does not exist",
                ),
            });
        }

        let history = HistoryLog::load(root)?.ok_or_else(|| RenameError::NoHistory {
            root: root.to_path_buf(),
        })?;

        let reversed: Vec<RenameOperation> = history.operations.into_iter().rev().collect();
        let report = undo_renames(&reversed, log);

        if report.is_complete_success() {
            HistoryLog::delete(root)?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let log = HistoryLog::new(
            root.to_path_buf(),
            vec![RenameOperation {
                old_path: root.join("a.txt"),
                new_path: root.join("b.txt"),
            }],
        );
        log.save().expect("Failed to save history");

        let loaded = HistoryLog::load(root).expect("Failed to load").expect("No history");
        assert_eq!(loaded, log);
    }

    #[test]
    fn test_load_without_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        assert!(HistoryLog::load(temp_dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(HistoryLog::history_file_path(root), "{ not json").unwrap();

        let result = HistoryLog::load(root);
        assert!(matches!(result, Err(RenameError::InvalidHistoryFormat { .. })));
    }

    #[test]
    fn test_undo_no_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = UndoManager::undo(temp_dir.path(), &mut |_: &str| {});
        assert!(matches!(result, Err(RenameError::NoHistory { .. })));
    }

    #[test]
    fn test_undo_invalid_root() {
        let result = UndoManager::undo(Path::new("/non/existent/path"), &mut |_: &str| {});
        assert!(matches!(result, Err(RenameError::InvalidRoot { .. })));
    }

    #[test]
    fn test_undo_restores_and_deletes_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("b.txt"), "content").unwrap();

        HistoryLog::new(
            root.to_path_buf(),
            vec![RenameOperation {
                old_path: root.join("a.txt"),
                new_path: root.join("b.txt"),
            }],
        )
        .save()
        .unwrap();

        let report = UndoManager::undo(root, &mut |_: &str| {}).expect("Undo failed");

        assert_eq!(report.restored, 1);
        assert!(root.join("a.txt").exists());
        assert!(!HistoryLog::history_file_path(root).exists());
    }

    #[test]
    fn test_partial_undo_keeps_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        HistoryLog::new(
            root.to_path_buf(),
            vec![RenameOperation {
                old_path: root.join("a.txt"),
                new_path: root.join("missing.txt"),
            }],
        )
        .save()
        .unwrap();

        let report = UndoManager::undo(root, &mut |_: &str| {}).expect("Undo failed");

        assert_eq!(report.skipped.len(), 1);
        assert!(HistoryLog::history_file_path(root).exists());
    }
}
