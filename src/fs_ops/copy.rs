//! Cross-device move fallback: verified copy, then remove the source.
//!
//! - Checks free space in the destination filesystem first.
//! - Copies into a hidden temp file in the destination directory
//!   (io_copy::copy_streaming creates it with O_EXCL and fsyncs it).
//! - Verifies the copied byte count against the source length.
//! - Publishes the temp under the final name without clobbering.
//! - Removes the source only after the copy is in place; if that fails the
//!   copy is withdrawn so the call leaves no net mutation.
//! - A symlink source is recreated as a link at the destination, pointing at
//!   the same target, never replaced by a copy of the target's bytes.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::RelocateError;

use super::atomic::publish_no_clobber;
use super::{io_copy, meta, space, util};

/// Copy `src` to `dest` (which must be free) and delete `src`.
/// Returns the number of bytes copied.
pub fn copy_then_remove(src: &Path, dest: &Path, preserve_metadata: bool) -> Result<u64, RelocateError> {
    let link_meta = fs::symlink_metadata(src).map_err(|e| RelocateError::from_io("stat source", src, &e))?;
    if link_meta.file_type().is_symlink() {
        relink_then_remove(src, dest)?;
        return Ok(0);
    }

    let src_meta = fs::metadata(src).map_err(|e| RelocateError::from_io("stat source", src, &e))?;
    let dest_dir = dest
        .parent()
        .ok_or_else(|| RelocateError::Io(format!("destination has no parent: {}", dest.display())))?;

    space::ensure_space_for_copy(dest_dir, src_meta.len())?;

    let tmp = util::unique_temp_path(dest_dir);
    let cleanup = |tmp: &Path| {
        if let Err(e) = fs::remove_file(tmp) {
            warn!(path = %tmp.display(), error = %e, "failed to remove temporary copy");
        }
    };

    let bytes = match io_copy::copy_streaming(src, &tmp) {
        Ok(n) => n,
        Err(e) => {
            cleanup(&tmp);
            return Err(RelocateError::from_io("copy to temporary file", &tmp, &e));
        }
    };
    if bytes != src_meta.len() {
        cleanup(&tmp);
        return Err(RelocateError::Io(format!(
            "copy of '{}' incomplete: copied {} of {} bytes (source changed during copy?)",
            src.display(),
            bytes,
            src_meta.len()
        )));
    }

    if preserve_metadata {
        meta::preserve_metadata(&tmp, &src_meta);
    }

    if let Err(e) = publish_no_clobber(&tmp, dest) {
        cleanup(&tmp);
        return Err(RelocateError::from_io("publish copied file", dest, &e));
    }
    debug!(src = %src.display(), dest = %dest.display(), bytes, "copy verified and published");

    if let Err(e) = fs::remove_file(src) {
        // Withdraw the copy: a failed relocation must leave the tree as it was.
        if let Err(undo) = fs::remove_file(dest) {
            warn!(dest = %dest.display(), error = %undo, "failed to withdraw copy after source removal failed");
        }
        return Err(RelocateError::from_io("remove original file", src, &e));
    }
    Ok(bytes)
}

/// Recreate the link `src` at `dest`, then remove `src`.
/// Relative targets are resolved against the link's own directory so the
/// new link still reaches the same file.
fn relink_then_remove(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    let target = fs::read_link(src).map_err(|e| RelocateError::from_io("read link", src, &e))?;
    let target = match src.parent() {
        Some(dir) if target.is_relative() => dir.join(target),
        _ => target,
    };

    // Symlink creation fails with AlreadyExists, so an occupied dest is kept.
    make_symlink(&target, dest).map_err(|e| RelocateError::from_io("create link", dest, &e))?;
    debug!(src = %src.display(), dest = %dest.display(), target = %target.display(), "link recreated");

    if let Err(e) = fs::remove_file(src) {
        if let Err(undo) = fs::remove_file(dest) {
            warn!(dest = %dest.display(), error = %undo, "failed to withdraw link after source removal failed");
        }
        return Err(RelocateError::from_io("remove original link", src, &e));
    }
    Ok(())
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_bytes_and_removes_source() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.bin");
        let out = td.path().join("out");
        fs::create_dir(&out).unwrap();
        let dest = out.join("a.bin");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 253) as u8).collect();
        fs::write(&src, &data).unwrap();

        let n = copy_then_remove(&src, &dest, false).unwrap();
        assert_eq!(n, data.len() as u64);
        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), data);
        // no temp files left behind
        let leftovers: Vec<_> = fs::read_dir(&out).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn missing_source_is_not_found() {
        let td = tempdir().unwrap();
        let src = td.path().join("gone.txt");
        let dest = td.path().join("dest.txt");
        let err = copy_then_remove(&src, &dest, false).unwrap_err();
        assert_eq!(err, RelocateError::NotFound(src));
        assert!(!dest.exists());
    }

    #[test]
    fn occupied_destination_is_left_alone() {
        let td = tempdir().unwrap();
        let src = td.path().join("src.txt");
        let dest = td.path().join("dest.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();
        let err = copy_then_remove(&src, &dest, false).unwrap_err();
        assert!(matches!(err, RelocateError::AlreadyExists(_)));
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert_eq!(fs::read(&src).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_source_is_moved_as_link() {
        let td = tempdir().unwrap();
        let data = td.path().join("data");
        let out = td.path().join("out");
        fs::create_dir(&data).unwrap();
        fs::create_dir(&out).unwrap();
        fs::write(data.join("real.txt"), b"payload").unwrap();
        let src = data.join("link.txt");
        std::os::unix::fs::symlink("real.txt", &src).unwrap();
        let dest = out.join("link.txt");

        assert_eq!(copy_then_remove(&src, &dest, false).unwrap(), 0);
        assert!(fs::symlink_metadata(&src).is_err());
        assert!(fs::symlink_metadata(&dest).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&dest).unwrap(), data.join("real.txt"));
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
        assert_eq!(fs::read(data.join("real.txt")).unwrap(), b"payload");
    }
}
