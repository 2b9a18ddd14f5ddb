//! Scanner: lazily enumerates regular files under a root.
//!
//! - Shallow scans list direct children only; recursive scans walk the tree
//!   depth-first up to `ScanOptions::max_depth`.
//! - Directories are never yielded. Directory symlinks are not followed.
//! - Walk errors (unreadable subdirectories) are logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::RelocateError;
use crate::types::FileEntry;

/// Default recursion bound for recursive scans.
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub recursive: bool,
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Lazy sequence of entries produced by [`scan`].
pub struct Scan {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Scan {
    /// Canonical root the scan started from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for Scan {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        loop {
            let entry = match self.inner.next()? {
                Ok(e) => e,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "skipping unreadable entry during scan");
                    continue;
                }
            };
            let ftype = entry.file_type();
            let is_file = if ftype.is_file() {
                true
            } else if ftype.is_symlink() {
                // Links to regular files are relocated as links.
                fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false)
            } else {
                false
            };
            if is_file {
                return Some(FileEntry::with_kind(entry.into_path(), true));
            }
        }
    }
}

/// Scan `root` for regular files, shallow or recursive.
pub fn scan(root: &Path, recursive: bool) -> Result<Scan, RelocateError> {
    scan_with(
        root,
        ScanOptions {
            recursive,
            ..ScanOptions::default()
        },
    )
}

/// Scan with explicit options. Fails with `NotADirectory` before yielding
/// anything if `root` is missing or not a directory.
pub fn scan_with(root: &Path, opts: ScanOptions) -> Result<Scan, RelocateError> {
    if !root.is_dir() {
        return Err(RelocateError::NotADirectory(root.to_path_buf()));
    }
    let root = dunce::canonicalize(root).map_err(|e| RelocateError::from_io("canonicalize", root, &e))?;
    let max_depth = if opts.recursive { opts.max_depth.max(1) } else { 1 };
    debug!(root = %root.display(), recursive = opts.recursive, max_depth, "starting scan");

    let inner = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    Ok(Scan { root, inner })
}
