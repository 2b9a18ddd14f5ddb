//! Rename helpers.
//! - `try_atomic_move` re-checks that the destination is free right before
//!   renaming, so a resolver/mutation race surfaces as AlreadyExists instead
//!   of clobbering on platforms where rename overwrites.
//! - `publish_no_clobber` links a finished temp file into place, which fails
//!   atomically if the destination appeared in the meantime.
//! - On Unix, best-effort fsync of the destination directory afterwards.

use std::fs;
use std::io;
use std::path::Path;

use super::util::{fsync_dir, is_occupied};

pub(super) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    if is_occupied(dst) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination appeared before rename: {}", dst.display()),
        ));
    }
    fs::rename(src, dst)?;
    sync_parent(dst);
    Ok(())
}

/// Move a temp file into `dst` without ever replacing an existing entry.
/// Falls back to a checked rename on filesystems without hard links.
pub(super) fn publish_no_clobber(tmp: &Path, dst: &Path) -> io::Result<()> {
    match fs::hard_link(tmp, dst) {
        Ok(()) => {
            // The data is reachable via `dst`; a stale temp is only clutter.
            let _ = fs::remove_file(tmp);
            sync_parent(dst);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(e),
        Err(_) => try_atomic_move(tmp, dst),
    }
}

fn sync_parent(dst: &Path) {
    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = fsync_dir(parent);
    }
}
