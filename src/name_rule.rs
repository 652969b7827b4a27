//! Rename rule evaluation.
//!
//! Maps a single file or folder name to its new name under one of the three
//! rename modes. Evaluation is pure: it never looks at the filesystem.
//!
//! # Examples
//!
//! ```
//! use qxrename::models::RenameMode;
//! use qxrename::name_rule::compute_new_name;
//!
//! assert_eq!(
//!     compute_new_name(RenameMode::Replace, "foo", "bar", "foobar.txt"),
//!     Some("barbar.txt".to_string())
//! );
//! assert_eq!(
//!     compute_new_name(RenameMode::Wildcard, "*.txt", "backup_*", "report.txt"),
//!     Some("backup_report".to_string())
//! );
//! ```

use crate::models::RenameMode;
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::path::Path;

/// Computes the new name for `name`, or `None` when the rule does not apply.
///
/// An empty pattern never matches. In regex mode an invalid pattern also
/// yields `None`; use [`pattern_error`] to tell the two apart.
pub fn compute_new_name(
    mode: RenameMode,
    pattern: &str,
    replacement: &str,
    name: &str,
) -> Option<String> {
    if pattern.is_empty() {
        return None;
    }

    match mode {
        RenameMode::Replace => Some(name.replace(pattern, replacement)),
        RenameMode::Wildcard => {
            let glob = compile_wildcard(pattern).ok()?;
            if !glob.matches_with(name, wildcard_options()) {
                return None;
            }
            if replacement.contains('*') {
                Some(replacement.replace('*', stem(name)))
            } else {
                Some(replacement.to_string())
            }
        }
        RenameMode::Regex => {
            let regex = Regex::new(pattern).ok()?;
            Some(regex.replace_all(name, replacement).into_owned())
        }
    }
}

/// Describes why `pattern` cannot be compiled under `mode`, if it cannot.
///
/// Planning treats a bad pattern as "no match"; this lets a caller show a
/// distinct diagnostic while the user is still typing.
pub fn pattern_error(mode: RenameMode, pattern: &str) -> Option<String> {
    if pattern.is_empty() {
        return None;
    }

    match mode {
        RenameMode::Replace => None,
        RenameMode::Wildcard => compile_wildcard(pattern).err().map(|e| e.to_string()),
        RenameMode::Regex => Regex::new(pattern).err().map(|e| e.to_string()),
    }
}

/// Compiles a wildcard pattern for matching a single name.
///
/// Runs of `*` collapse to one so that `**` behaves like `*` on a name
/// instead of being rejected as a misplaced recursive wildcard. A `[` with
/// no closing `]` matches itself.
fn compile_wildcard(pattern: &str) -> Result<Pattern, glob::PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut collapsed = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if collapsed.ends_with('*') => {}
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    collapsed.extend(&chars[i..=end]);
                    i = end;
                }
                None => collapsed.push_str("[[]"),
            },
            ch => collapsed.push(ch),
        }
        i += 1;
    }
    Pattern::new(&collapsed)
}

/// Index of the `]` closing the class opened at `start`. A `]` directly
/// after `[` or `[!` belongs to the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

/// Case sensitivity follows the host filesystem convention.
fn wildcard_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: !cfg!(windows),
        require_literal_separator: false,
        require_literal_leading_dot: false,
    }
}

/// The name without its final extension. Leading-dot names keep their dot.
fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
