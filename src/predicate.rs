//! Match predicate: pure, case-insensitive name tests.

use crate::types::{FileEntry, MatchCriterion};

/// True if `entry` satisfies `criterion`. Directories never match.
pub fn matches(entry: &FileEntry, criterion: &MatchCriterion) -> bool {
    if !entry.is_file {
        return false;
    }
    let name = entry.name_lossy().to_lowercase();
    match criterion {
        MatchCriterion::Substring(text) => name.contains(&text.to_lowercase()),
        // Compared literally: ".mp4" and "mp4" are different criteria.
        MatchCriterion::ExtensionSuffix(text) => name.ends_with(&text.to_lowercase()),
    }
}
