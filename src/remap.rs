//! Rewriting descendant paths after their ancestor folders are renamed.

use std::path::{Path, PathBuf};

/// Pending folder renames, ordered deepest (longest old path) first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderMappings {
    mappings: Vec<(PathBuf, PathBuf)>,
}

impl FolderMappings {
    /// Builds the mapping set from `(old_folder, new_folder)` pairs in any order.
    pub fn new(pairs: impl IntoIterator<Item = (PathBuf, PathBuf)>) -> Self {
        let mut mappings: Vec<_> = pairs.into_iter().collect();
        // Stable, so equal lengths keep their input order.
        mappings.sort_by_key(|(old, _)| std::cmp::Reverse(old.as_os_str().len()));
        Self { mappings }
    }

    /// The mappings in application order.
    pub fn as_slice(&self) -> &[(PathBuf, PathBuf)] {
        &self.mappings
    }

    /// Remaps `path` through every mapping. See [`remap_path`].
    pub fn remap(&self, path: &Path) -> PathBuf {
        remap_path(path, &self.mappings)
    }
}

/// Rewrites `path` to reflect renamed ancestor folders.
///
/// `mappings` must be sorted deepest first. Each mapping whose old folder
/// equals `path` or is a component-wise prefix of it swaps that prefix for the
/// new folder, and later (shallower) mappings are matched against the
/// already-rewritten path, so a grandparent and a parent rename compose in a
/// single pass.
///
/// # Examples
///
/// ```
/// use qxrename::remap::remap_path;
/// use std::path::{Path, PathBuf};
///
/// let mappings = vec![
///     (PathBuf::from("a/b"), PathBuf::from("a/bb")),
///     (PathBuf::from("a"), PathBuf::from("aa")),
/// ];
/// assert_eq!(remap_path(Path::new("a/b/c.txt"), &mappings), Path::new("aa/bb/c.txt"));
/// ```
pub fn remap_path(path: &Path, mappings: &[(PathBuf, PathBuf)]) -> PathBuf {
    let mut updated = path.to_path_buf();
    for (old_folder, new_folder) in mappings {
        if let Ok(rest) = updated.strip_prefix(old_folder) {
            updated = if rest.as_os_str().is_empty() {
                new_folder.clone()
            } else {
                new_folder.join(rest)
            };
        }
    }
    updated
}
