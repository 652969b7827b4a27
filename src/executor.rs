/// Applying a rename plan to the filesystem and reverting it.
///
/// Renames run in two phases: every file is renamed inside its original
/// folder first, then folders are renamed deepest first. Each rename either
/// succeeds or is logged and skipped; a batch never aborts half-way.
use crate::models::{ItemKind, PreviewEntry, RenameOperation};
use crate::remap::{FolderMappings, remap_path};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Receives one human-readable line per attempted operation.
pub trait LogSink {
    fn log(&mut self, line: &str);
}

impl<F: FnMut(&str)> LogSink for F {
    fn log(&mut self, line: &str) {
        self(line)
    }
}

/// Returns true if anything, including a dangling symlink, sits at `path`.
pub fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Renames `from` to `to`, refusing to replace an existing entry.
fn rename_no_clobber(from: &Path, to: &Path) -> io::Result<()> {
    if path_occupied(to) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "target already exists",
        ));
    }
    fs::rename(from, to)
}

/// One rename waiting to be applied.
struct RenameJob {
    kind: ItemKind,
    from: PathBuf,
    to: PathBuf,
    /// Where the item ends up once the whole batch has run.
    logged: PathBuf,
}

/// Applies the ready entries of a plan and returns the undo log.
///
/// Entries that are not ready are ignored. Files are renamed first using
/// their in-place `raw_new_path`, and logged under the path they reach after
/// the folder renames that follow. Folders are then renamed deepest first.
/// Only successful renames appear in the returned log, in the order they
/// were applied.
///
/// Within a phase, an item whose target is still held by another item of the
/// same phase that has yet to move waits until that item has moved, so chains
/// such as `a -> b, b -> c` apply cleanly. A folder also waits while any
/// of its waiting descendants still has to move.
pub fn apply_renames(entries: &[PreviewEntry], log: &mut impl LogSink) -> Vec<RenameOperation> {
    let ready: Vec<&PreviewEntry> = entries.iter().filter(|e| e.is_ready()).collect();

    let mappings = FolderMappings::new(
        ready
            .iter()
            .filter(|e| e.kind == ItemKind::Folder)
            .map(|e| (e.old_path.clone(), e.raw_new_path.clone())),
    );

    let file_jobs = ready
        .iter()
        .filter(|e| e.kind == ItemKind::File)
        .map(|e| RenameJob {
            kind: ItemKind::File,
            from: e.old_path.clone(),
            to: e.raw_new_path.clone(),
            logged: mappings.remap(&e.raw_new_path),
        })
        .collect();

    let mut folder_jobs: Vec<RenameJob> = ready
        .iter()
        .filter(|e| e.kind == ItemKind::Folder)
        .map(|e| RenameJob {
            kind: ItemKind::Folder,
            from: e.old_path.clone(),
            to: e.raw_new_path.clone(),
            logged: e.final_new_path.clone(),
        })
        .collect();
    folder_jobs.sort_by_key(|job| std::cmp::Reverse(job.from.as_os_str().len()));

    let mut operations = Vec::new();
    run_phase(file_jobs, log, &mut operations);
    run_phase(folder_jobs, log, &mut operations);
    operations
}

fn run_phase(jobs: Vec<RenameJob>, log: &mut impl LogSink, operations: &mut Vec<RenameOperation>) {
    let mut waiting: HashSet<PathBuf> = jobs.iter().map(|job| job.from.clone()).collect();
    let mut pending = jobs;

    while !pending.is_empty() {
        let mut deferred: Vec<RenameJob> = Vec::new();
        let mut attempted = false;

        for job in pending {
            let blocked = job.to != job.from && waiting.contains(&job.to) && path_occupied(&job.to);
            // A folder must not move while a deferred descendant still needs its old path.
            let holds_deferred = deferred
                .iter()
                .any(|d| d.from.starts_with(&job.from));
            if blocked || holds_deferred {
                deferred.push(job);
                continue;
            }
            waiting.remove(&job.from);
            attempt(job, log, operations);
            attempted = true;
        }

        if !attempted {
            // Every remaining job waits on another one: a rename cycle.
            for job in deferred {
                attempt(job, log, operations);
            }
            break;
        }
        pending = deferred;
    }
}

fn attempt(job: RenameJob, log: &mut impl LogSink, operations: &mut Vec<RenameOperation>) {
    let kind = job.kind.label();
    match rename_no_clobber(&job.from, &job.to) {
        Ok(()) => {
            log.log(&format!(
                "Renamed {}: {} -> {}",
                kind,
                job.from.display(),
                job.logged.display()
            ));
            operations.push(RenameOperation {
                old_path: job.from,
                new_path: job.logged,
            });
        }
        Err(e) => {
            log.log(&format!(
                "Failed to rename {}: {} -> {} ({})",
                kind,
                job.from.display(),
                job.to.display(),
                e
            ));
        }
    }
}

/// Represents the result of an undo run.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Number of entries successfully restored.
    pub restored: usize,
    /// Entries that were skipped, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Entries whose rename back failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// Returns the total number of operations processed.
    pub fn total_processed(&self) -> usize {
        self.restored + self.skipped.len() + self.failed.len()
    }

    /// Returns true if every operation was restored.
    pub fn is_complete_success(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Reverts `operations` by renaming each `new_path` back to its `old_path`,
/// in the order given.
///
/// Pass the log in reverse of its application order for a strict inverse.
/// Moves made earlier in the same undo run are followed: once a folder is
/// renamed back, later operations look for their `new_path` under the
/// folder's restored location. An operation whose `new_path` is gone, or
/// whose `old_path` is taken, is skipped and logged.
pub fn undo_renames(operations: &[RenameOperation], log: &mut impl LogSink) -> UndoReport {
    let mut report = UndoReport::default();
    let mut relocations: Vec<(PathBuf, PathBuf)> = Vec::new();

    for op in operations {
        let mut current = op.new_path.clone();
        for relocation in &relocations {
            current = remap_path(&current, std::slice::from_ref(relocation));
        }

        if !path_occupied(&current) {
            log.log(&format!("Undo skipped (missing): {}", current.display()));
            report
                .skipped
                .push((current, "not found at expected location".to_string()));
            continue;
        }

        if path_occupied(&op.old_path) {
            log.log(&format!(
                "Undo skipped (target exists): {}",
                op.old_path.display()
            ));
            report
                .skipped
                .push((op.old_path.clone(), "original path is occupied".to_string()));
            continue;
        }

        match fs::rename(&current, &op.old_path) {
            Ok(()) => {
                log.log(&format!(
                    "Undo: {} -> {}",
                    current.display(),
                    op.old_path.display()
                ));
                relocations.push((current, op.old_path.clone()));
                report.restored += 1;
            }
            Err(e) => {
                log.log(&format!(
                    "Undo failed: {} -> {} ({})",
                    current.display(),
                    op.old_path.display(),
                    e
                ));
                report.failed.push((current, e.to_string()));
            }
        }
    }

    report
}
