//! Collision resolution: turn a desired destination into a free one.
//!
//! Policy: if the desired path is free it is returned unchanged, otherwise
//! `stem_1.ext`, `stem_2.ext`, ... are tried in order and the first free
//! candidate wins. The search has no upper bound; each candidate is new, so
//! it terminates for any finite set of existing entries.
//!
//! Notes:
//! - This only decides a name from the current filesystem state. Another
//!   process may create the same candidate between this check and the
//!   caller's rename (time-of-check/time-of-use). That window is accepted for
//!   a single-user tool; callers surface it as `AlreadyExists` when the
//!   mutation primitive can detect it.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::trace;

use super::util::is_occupied;

/// Return `desired` if nothing occupies it, else the first free numbered
/// variant.
pub fn resolve(desired: &Path) -> PathBuf {
    resolve_with(desired, |_| false)
}

/// Like [`resolve`], but also treats paths for which `taken` returns true as
/// occupied. Used by planners that reserve destinations without touching
/// the filesystem.
pub fn resolve_with<F>(desired: &Path, taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let occupied = |p: &Path| is_occupied(p) || taken(p);
    if !occupied(desired) {
        return desired.to_path_buf();
    }

    let dir = desired.parent().unwrap_or_else(|| Path::new(""));
    let name = desired.file_name().unwrap_or_else(|| OsStr::new(""));
    let (stem, ext) = split_os_name(name);

    let mut n: u64 = 1;
    loop {
        let candidate = dir.join(numbered_name(&stem, ext.as_deref(), n));
        if !occupied(&candidate) {
            return candidate;
        }
        if n == 3 {
            trace!(name = ?name, dir = %dir.display(), "duplicate: multiple collisions, continuing to search");
        }
        n += 1;
    }
}

/// Reservation set for resolving several destinations in one dry-run plan.
#[derive(Debug, Default)]
pub struct Reservations {
    claimed: HashSet<PathBuf>,
}

impl Reservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `desired` against the filesystem and earlier claims, then
    /// claim the result.
    pub fn claim(&mut self, desired: &Path) -> PathBuf {
        let free = resolve_with(desired, |p| self.claimed.contains(p));
        self.claimed.insert(free.clone());
        free
    }
}

/// Split into stem and extension (without dot), keeping non-UTF8 intact.
/// Dotfiles like ".env" have no extension.
fn split_os_name(name: &OsStr) -> (OsString, Option<OsString>) {
    let p = Path::new(name);
    let stem = p
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| name.to_os_string());
    let ext = p.extension().map(OsStr::to_os_string);
    (stem, ext)
}

fn numbered_name(stem: &OsStr, ext: Option<&OsStr>, n: u64) -> OsString {
    let mut out = OsString::from(stem);
    out.push(format!("_{n}"));
    if let Some(e) = ext {
        out.push(".");
        out.push(e);
    }
    out
}
