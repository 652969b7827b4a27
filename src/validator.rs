//! Structural validation of computed names.

use std::fmt;

/// Characters the desktop Windows convention forbids in file names.
#[cfg(windows)]
const RESERVED_CHARACTERS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Why a computed name cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameIssue {
    Empty,
    PathSeparator,
    ReservedCharacters,
}

impl fmt::Display for NameIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            NameIssue::Empty => "empty name",
            NameIssue::PathSeparator => "path separator in name",
            NameIssue::ReservedCharacters => "invalid characters for this platform",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for NameIssue {}

/// Returns the first problem with `name`, or `None` if it is a legal name.
pub fn validate_name(name: &str) -> Option<NameIssue> {
    if name.is_empty() {
        return Some(NameIssue::Empty);
    }
    if name.chars().any(std::path::is_separator) {
        return Some(NameIssue::PathSeparator);
    }
    if has_reserved_characters(name) {
        return Some(NameIssue::ReservedCharacters);
    }
    None
}

#[cfg(windows)]
fn has_reserved_characters(name: &str) -> bool {
    name.contains(RESERVED_CHARACTERS)
}

#[cfg(not(windows))]
fn has_reserved_characters(_name: &str) -> bool {
    false
}
