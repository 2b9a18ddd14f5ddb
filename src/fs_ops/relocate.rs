//! Relocator: rename-in-place or move-to-folder for a single entry.
//!
//! Every call returns a `RelocationResult`; I/O failures are captured as
//! `Failed(reason)` and never propagated. A successful call performs exactly
//! one mutation (rename, or the copy+remove fallback across devices); a
//! failed call performs none, apart from creating a missing target folder.
//!
//! The destination is picked by the collision resolver and re-checked just
//! before the rename. A concurrent process creating the same name inside
//! that window is the accepted time-of-check/time-of-use limitation; when it
//! is detected it surfaces as `AlreadyExists` and is logged as an error.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::errors::RelocateError;
use crate::types::{CaseHandling, DestinationPolicy, FileEntry, RelocationResult, split_name};

use super::atomic::try_atomic_move;
use super::copy::copy_then_remove;
use super::duplicate::resolve;
use super::util::{is_cross_device, same_entry, same_location};

/// Knobs that do not change where a file ends up.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelocateOptions {
    /// Copy permissions and timestamps when a move falls back to copying.
    pub preserve_metadata: bool,
}

/// Relocate `entry` according to `policy` with default options.
pub fn relocate(entry: &FileEntry, policy: &DestinationPolicy) -> RelocationResult {
    relocate_with(entry, policy, &RelocateOptions::default())
}

pub fn relocate_with(
    entry: &FileEntry,
    policy: &DestinationPolicy,
    opts: &RelocateOptions,
) -> RelocationResult {
    let src = entry.path.as_path();

    if let Err(e) = fs::symlink_metadata(src) {
        let err = RelocateError::from_io("stat source", src, &e);
        warn!(src = %src.display(), code = err.code(), kind = err.kind(), "entry vanished before relocation");
        return RelocationResult::failed(src, None, err);
    }

    let desired = match desired_path(entry, policy) {
        Ok(p) => p,
        Err(err) => {
            warn!(src = %src.display(), code = err.code(), kind = err.kind(), %err, "cannot compute destination");
            return RelocationResult::failed(src, None, err);
        }
    };

    if let DestinationPolicy::MoveToFolder(dir) = policy
        && let Err(err) = ensure_target_dir(dir)
    {
        warn!(dir = %dir.display(), code = err.code(), kind = err.kind(), %err, "cannot prepare target folder");
        return RelocationResult::failed(src, Some(desired), err);
    }

    if same_location(src, &desired) {
        debug!(src = %src.display(), desired = %desired.display(), "already at destination; nothing to do");
        return RelocationResult::succeeded(src, src.to_path_buf());
    }

    // Case-only change of the same entry (case-insensitive filesystems).
    if differs_only_in_case(src, &desired) && same_entry(src, &desired) {
        return match fs::rename(src, &desired) {
            Ok(()) => {
                info!(src = %src.display(), dest = %desired.display(), "Renamed file (case only)");
                RelocationResult::succeeded(src, desired)
            }
            Err(e) => fail(src, desired.clone(), RelocateError::from_io("rename", &desired, &e)),
        };
    }

    let dest = resolve(&desired);
    if dest != desired {
        debug!(desired = %desired.display(), dest = %dest.display(), "destination occupied; using numbered name");
    }

    match try_atomic_move(src, &dest) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dest.display(), "Relocated file");
            RelocationResult::succeeded(src, dest)
        }
        Err(e) if is_cross_device(&e) => {
            warn!(src = %src.display(), dest = %dest.display(), "cross-filesystem move; falling back to copy+remove");
            match copy_then_remove(src, &dest, opts.preserve_metadata) {
                Ok(bytes) => {
                    info!(src = %src.display(), dest = %dest.display(), bytes, "Copied file and removed source");
                    RelocationResult::succeeded(src, dest)
                }
                Err(err) => fail(src, dest, err),
            }
        }
        Err(e) => fail(src, dest.clone(), RelocateError::from_io("rename", &dest, &e)),
    }
}

fn fail(src: &Path, dest: PathBuf, err: RelocateError) -> RelocationResult {
    if matches!(err, RelocateError::AlreadyExists(_)) {
        error!(src = %src.display(), dest = %dest.display(), code = err.code(), "destination taken after collision check");
    } else {
        warn!(src = %src.display(), dest = %dest.display(), code = err.code(), kind = err.kind(), %err, "Relocation failed");
    }
    RelocationResult::failed(src, Some(dest), err)
}

fn differs_only_in_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}

/// Where `policy` wants `entry` to go, before collision resolution.
/// Pure: does not touch the filesystem.
pub fn desired_path(entry: &FileEntry, policy: &DestinationPolicy) -> Result<PathBuf, RelocateError> {
    match policy {
        DestinationPolicy::RenameInPlace { remove, case } => {
            let name = entry
                .name
                .to_str()
                .ok_or_else(|| RelocateError::UnsupportedName(entry.path.clone()))?;
            let new_name = strip_name(name, remove, *case).ok_or_else(|| RelocateError::EmptyResult {
                name: name.to_string(),
            })?;
            Ok(entry.parent().join(new_name))
        }
        DestinationPolicy::MoveToFolder(dir) => Ok(dir.join(&entry.name)),
    }
}

/// Remove every case-insensitive occurrence of `remove` from `name`.
///
/// The stem is tried first so the extension survives (`a_tmp.txt` ->
/// `a.txt`). When only the full name contains the text (it runs into the
/// extension) the removal applies to the whole name. Separators (`_`, `-`)
/// and whitespace left dangling at the ends are trimmed. Returns `None` when
/// nothing usable remains: an empty name or a bare extension. A name with no
/// occurrence at all is returned unchanged, whatever the case policy.
pub fn strip_name(name: &str, remove: &str, case: CaseHandling) -> Option<String> {
    let is_sep = |c: char| c.is_whitespace() || c == '_' || c == '-';
    let (stem, ext) = split_name(name);

    let (stripped, removed) = remove_case_insensitive(stem, remove);
    let out = if removed {
        let stem = stripped.trim_matches(is_sep);
        if stem.is_empty() {
            return None;
        }
        format!("{stem}{}", ext.unwrap_or(""))
    } else {
        let (whole, removed) = remove_case_insensitive(name, remove);
        if !removed {
            return Some(name.to_string());
        }
        let whole = whole
            .trim_matches(is_sep)
            .trim_end_matches('.')
            .trim_end_matches(is_sep);
        if whole.is_empty() || whole.starts_with('.') {
            return None;
        }
        whole.to_string()
    };

    Some(match case {
        CaseHandling::Lowercase => out.to_lowercase(),
        CaseHandling::Preserve => out,
    })
}

/// Non-overlapping, left-to-right removal of `needle` from `haystack`,
/// comparing lower-cased text but keeping the case of what remains.
fn remove_case_insensitive(haystack: &str, needle: &str) -> (String, bool) {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return (haystack.to_string(), false);
    }

    // Folded text and, per folded byte, the offset of the char it came from.
    let mut folded = String::with_capacity(haystack.len());
    let mut origin: Vec<usize> = Vec::with_capacity(haystack.len());
    for (idx, ch) in haystack.char_indices() {
        let before = folded.len();
        folded.extend(ch.to_lowercase());
        origin.resize(origin.len() + (folded.len() - before), idx);
    }
    // A match must cover whole original chars.
    let boundary = |i: usize| i == 0 || i == folded.len() || origin[i] != origin[i - 1];

    let mut out = String::with_capacity(haystack.len());
    let mut copied = 0;
    let mut from = 0;
    let mut removed = false;
    while let Some(rel) = folded[from..].find(needle.as_str()) {
        let start = from + rel;
        let end = start + needle.len();
        if boundary(start) && boundary(end) {
            let orig_start = origin[start];
            let orig_end = if end == folded.len() { haystack.len() } else { origin[end] };
            out.push_str(&haystack[copied..orig_start]);
            copied = orig_end;
            removed = true;
            from = end;
        } else {
            from = start + folded[start..].chars().next().map_or(1, char::len_utf8);
        }
    }
    out.push_str(&haystack[copied..]);
    (out, removed)
}

/// Create the target folder if needed; idempotent.
fn ensure_target_dir(dir: &Path) -> Result<(), RelocateError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(RelocateError::NotADirectory(dir.to_path_buf())),
        Err(_) => {
            fs::create_dir_all(dir).map_err(|e| RelocateError::from_io("create target folder", dir, &e))?;
            info!(dir = %dir.display(), "Created target folder");
            Ok(())
        }
    }
}
