//! Dry-run planning: the destinations a round would use, without mutating.
//!
//! Destinations within one plan are pairwise distinct: each resolved path is
//! reserved so later entries with the same desired name get the next number,
//! matching what sequential execution produces. Sources vacated earlier in
//! the plan are still treated as occupied, so a preview can number a name
//! that execution would leave plain.

use std::path::PathBuf;

use crate::errors::RelocateError;
use crate::types::{DestinationPolicy, FileEntry};

use super::duplicate::Reservations;
use super::relocate::desired_path;
use super::util::same_location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRelocation {
    pub source: PathBuf,
    /// Where the file would go, or why it cannot be relocated.
    pub destination: Result<PathBuf, RelocateError>,
}

impl PlannedRelocation {
    pub fn is_noop(&self) -> bool {
        matches!(&self.destination, Ok(d) if *d == self.source)
    }
}

pub fn plan(entries: &[FileEntry], policy: &DestinationPolicy) -> Vec<PlannedRelocation> {
    let mut reservations = Reservations::new();
    entries
        .iter()
        .map(|entry| {
            let destination = desired_path(entry, policy).map(|desired| {
                if same_location(&entry.path, &desired) {
                    entry.path.clone()
                } else {
                    reservations.claim(&desired)
                }
            });
            PlannedRelocation {
                source: entry.path.clone(),
                destination,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn plan_numbers_duplicate_targets() {
        let td = tempdir().unwrap();
        let out = td.path().join("out");
        let a = td.path().join("a");
        let b = td.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("x.gif"), b"1").unwrap();
        fs::write(b.join("x.gif"), b"2").unwrap();
        let entries = vec![
            FileEntry::from_path(a.join("x.gif")),
            FileEntry::from_path(b.join("x.gif")),
        ];

        let planned = plan(&entries, &DestinationPolicy::move_to_folder(&out));
        assert_eq!(planned[0].destination, Ok(out.join("x.gif")));
        assert_eq!(planned[1].destination, Ok(out.join("x_1.gif")));
        // nothing touched
        assert!(!out.exists());
        assert!(a.join("x.gif").exists());
    }

    #[test]
    fn plan_reports_empty_result() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("tmp.txt"), b"").unwrap();
        let entries = vec![FileEntry::from_path(td.path().join("tmp.txt"))];
        let planned = plan(&entries, &DestinationPolicy::rename_in_place("tmp"));
        assert!(matches!(planned[0].destination, Err(RelocateError::EmptyResult { .. })));
    }

    #[test]
    fn unchanged_name_is_noop() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("keep.txt"), b"").unwrap();
        let entries = vec![FileEntry::from_path(td.path().join("keep.txt"))];
        let planned = plan(&entries, &DestinationPolicy::rename_in_place("zzz"));
        assert!(planned[0].is_noop());
    }
}
