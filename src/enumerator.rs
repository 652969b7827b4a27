//! Lazy enumeration of rename candidates under a root directory.

use crate::models::ItemKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file or folder found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedItem {
    pub path: PathBuf,
    pub kind: ItemKind,
}

/// Lists the entries under `root`, lazily.
///
/// Without `recursive` only the direct children of `root` are listed. With it,
/// the whole subtree is walked top-down, so a folder is always yielded before
/// anything inside it. Siblings come in file-name order. Symbolic links are
/// classified by their target but never descended into.
///
/// If `root` is not a readable directory, nothing is yielded; unreadable
/// subdirectories are skipped.
pub fn enumerate_entries(
    root: &Path,
    recursive: bool,
    include_files: bool,
    include_folders: bool,
) -> impl Iterator<Item = EnumeratedItem> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let walker = root.is_dir().then(|| {
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
    });

    walker
        .into_iter()
        .flat_map(|walker| walker.into_iter())
        .filter_map(Result::ok)
        .filter_map(move |entry| {
            let path = entry.into_path();
            let kind = if path.is_dir() {
                ItemKind::Folder
            } else if path.is_file() {
                ItemKind::File
            } else {
                return None;
            };

            let wanted = match kind {
                ItemKind::Folder => include_folders,
                ItemKind::File => include_files,
            };
            wanted.then_some(EnumeratedItem { path, kind })
        })
}
