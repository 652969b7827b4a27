//! Rename planning.
//!
//! Builds the full rename plan for a request without touching the
//! filesystem: every candidate gets its new name, its final path once
//! renamed ancestors are accounted for, and a ready/conflict/invalid status.

use crate::config::CompiledFilters;
use crate::enumerator::{EnumeratedItem, enumerate_entries};
use crate::executor::path_occupied;
use crate::models::{
    EntryStatus, ItemKind, PreviewEntry, PreviewPlan, PreviewRequest, PreviewStats,
};
use crate::name_rule::compute_new_name;
use crate::remap::FolderMappings;
use crate::validator::validate_name;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const MSG_DUPLICATE_TARGET: &str = "multiple items target same path";
pub const MSG_TARGET_EXISTS: &str = "target already exists";

/// A rename that passed validation and still needs collision analysis.
struct Tentative {
    kind: ItemKind,
    old_path: PathBuf,
    raw_new_path: PathBuf,
}

/// Plans the renames described by `request`.
///
/// `cancel_check` is polled once per enumerated item and once per item during
/// collision analysis; as soon as it returns `true` the run stops and returns
/// no entries. Nothing here returns an error: a missing root gives an empty
/// plan and every irregularity is reported as an entry status.
///
/// # Examples
///
/// ```no_run
/// use qxrename::models::{PreviewRequest, RenameMode};
/// use qxrename::planner::build_preview;
/// use std::path::PathBuf;
///
/// let request = PreviewRequest {
///     root_directory: PathBuf::from("/path/to/photos"),
///     recursive: true,
///     include_files: true,
///     include_folders: false,
///     mode: RenameMode::Regex,
///     pattern: r"^img_(\d+)".to_string(),
///     replacement: "photo_$1".to_string(),
/// };
/// let plan = build_preview(&request, || false);
/// println!("{} ready, {} conflicts", plan.stats.ready, plan.stats.conflicts);
/// ```
pub fn build_preview(request: &PreviewRequest, cancel_check: impl FnMut() -> bool) -> PreviewPlan {
    build_preview_filtered(request, &CompiledFilters::permissive(), cancel_check)
}

/// Like [`build_preview`], but only entries accepted by `filters` are planned
/// or counted. Filters see each path relative to the root.
pub fn build_preview_filtered(
    request: &PreviewRequest,
    filters: &CompiledFilters,
    mut cancel_check: impl FnMut() -> bool,
) -> PreviewPlan {
    let root = request.root_directory.as_path();
    if !root.is_dir() {
        return PreviewPlan::default();
    }

    let mut items: Vec<EnumeratedItem> = Vec::new();
    for item in enumerate_entries(
        root,
        request.recursive,
        request.include_files,
        request.include_folders,
    ) {
        if cancel_check() {
            return PreviewPlan::default();
        }
        let relative = item.path.strip_prefix(root).unwrap_or(&item.path);
        if filters.should_include(relative) {
            items.push(item);
        }
    }

    let mut stats = PreviewStats::with_total(items.len());
    let mut entries = Vec::new();
    let mut tentative = Vec::new();

    for item in items {
        if cancel_check() {
            return cancelled(stats);
        }

        // Names that are not valid UTF-8 cannot be matched by the rule.
        let Some(name) = item.path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(new_name) = compute_new_name(
            request.mode,
            &request.pattern,
            &request.replacement,
            name,
        ) else {
            continue;
        };
        if new_name == name {
            continue;
        }

        let parent = item.path.parent().unwrap_or(root);
        let raw_new_path = parent.join(&new_name);

        if let Some(issue) = validate_name(&new_name) {
            entries.push(PreviewEntry {
                kind: item.kind,
                old_path: item.path,
                final_new_path: raw_new_path.clone(),
                raw_new_path,
                status: EntryStatus::Invalid,
                message: issue.to_string(),
            });
            stats = stats.counted(EntryStatus::Invalid);
            continue;
        }

        tentative.push(Tentative {
            kind: item.kind,
            old_path: item.path,
            raw_new_path,
        });
    }

    let mappings = FolderMappings::new(
        tentative
            .iter()
            .filter(|t| t.kind == ItemKind::Folder)
            .map(|t| (t.old_path.clone(), t.raw_new_path.clone())),
    );

    let final_paths: Vec<PathBuf> = tentative
        .iter()
        .map(|t| final_path(t, &mappings))
        .collect();

    let mut target_counts: HashMap<&Path, usize> = HashMap::new();
    for path in &final_paths {
        *target_counts.entry(path.as_path()).or_insert(0) += 1;
    }

    let sources: HashSet<&Path> = tentative.iter().map(|t| t.old_path.as_path()).collect();

    let mut classified = Vec::with_capacity(tentative.len());
    for (t, final_new_path) in tentative.iter().zip(&final_paths) {
        if cancel_check() {
            return cancelled(stats);
        }

        let (status, message) = if target_counts[final_new_path.as_path()] > 1 {
            (EntryStatus::Conflict, MSG_DUPLICATE_TARGET)
        } else if path_occupied(final_new_path) && !sources.contains(final_new_path.as_path()) {
            (EntryStatus::Conflict, MSG_TARGET_EXISTS)
        } else {
            (EntryStatus::Ready, "")
        };

        stats = stats.counted(status);
        classified.push(PreviewEntry {
            kind: t.kind,
            old_path: t.old_path.clone(),
            raw_new_path: t.raw_new_path.clone(),
            final_new_path: final_new_path.clone(),
            status,
            message: message.to_string(),
        });
    }
    entries.extend(classified);

    PreviewPlan { entries, stats }
}

/// A folder's own target is never remapped; files follow their ancestors.
fn final_path(tentative: &Tentative, mappings: &FolderMappings) -> PathBuf {
    match tentative.kind {
        ItemKind::Folder => tentative.raw_new_path.clone(),
        ItemKind::File => mappings.remap(&tentative.raw_new_path),
    }
}

fn cancelled(stats: PreviewStats) -> PreviewPlan {
    PreviewPlan {
        entries: Vec::new(),
        stats,
    }
}
