//! qxrename - batch renaming of files and folders
//!
//! This library plans renames from a replace, wildcard or regex rule,
//! detects collisions without touching the filesystem, applies the
//! conflict-free part of a plan in a safe order, and undoes applied batches.

pub mod cli;
pub mod config;
pub mod enumerator;
pub mod executor;
pub mod history;
pub mod models;
pub mod name_rule;
pub mod output;
pub mod planner;
pub mod remap;
pub mod validator;

pub use config::{CompiledFilters, ConfigError, RenameConfig};
pub use executor::{LogSink, UndoReport, apply_renames, undo_renames};
pub use history::{HistoryLog, RenameError, UndoManager};
pub use models::{
    EntryStatus, ItemKind, PreviewEntry, PreviewPlan, PreviewRequest, PreviewStats,
    RenameMode, RenameOperation,
};
pub use name_rule::compute_new_name;
pub use planner::{build_preview, build_preview_filtered};
pub use remap::{FolderMappings, remap_path};
pub use validator::{NameIssue, validate_name};

pub use cli::{RenameCommand, RenameRule, run_cli};
