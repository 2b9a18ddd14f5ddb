use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of the hidden temp files written by the copy fallback.
pub(crate) const TEMP_PREFIX: &str = ".bulk_relocate.";

pub(super) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dst_dir.join(format!("{TEMP_PREFIX}{pid}.{nanos}.tmp"))
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // io::ErrorKind::CrossesDevices is not stable everywhere; use raw codes.
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17, // ERROR_NOT_SAME_DEVICE
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

/// Any directory entry occupies `path`, including dangling symlinks.
pub(crate) fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// True if `a` and `b` name the same directory entry (e.g. differ only in
/// case on a case-insensitive filesystem).
pub(super) fn same_entry(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    let (Ok(ma), Ok(mb)) = (fs::symlink_metadata(a), fs::symlink_metadata(b)) else {
        return false;
    };
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        ma.dev() == mb.dev() && ma.ino() == mb.ino()
    }
    #[cfg(not(unix))]
    {
        let _ = (ma, mb);
        match (dunce::canonicalize(a), dunce::canonicalize(b)) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        }
    }
}

/// True if `desired` names the very entry at `src`: same file name in the
/// same directory, however either directory is spelled (`..`, relative,
/// symlinked alias). Hard links under other names do not count.
pub(super) fn same_location(src: &Path, desired: &Path) -> bool {
    if src == desired {
        return true;
    }
    if src.file_name() != desired.file_name() {
        return false;
    }
    match (src.parent(), desired.parent()) {
        (Some(a), Some(b)) => match (dunce::canonicalize(a), dunce::canonicalize(b)) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn temp_path_is_hidden_and_inside_dir() {
        let td = tempdir().unwrap();
        let p = unique_temp_path(td.path());
        assert!(p.starts_with(td.path()));
        let name = p.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(TEMP_PREFIX));
    }

    #[cfg(unix)]
    #[test]
    fn exdev_is_cross_device() {
        assert!(is_cross_device(&io::Error::from_raw_os_error(libc::EXDEV)));
        assert!(!is_cross_device(&io::Error::from_raw_os_error(libc::EACCES)));
        assert!(!is_cross_device(&io::Error::other("x")));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_occupies_path() {
        let td = tempdir().unwrap();
        let link = td.path().join("dangling");
        std::os::unix::fs::symlink(td.path().join("missing"), &link).unwrap();
        assert!(!link.exists());
        assert!(is_occupied(&link));
    }

    #[test]
    fn same_location_sees_through_dot_dot() {
        let td = tempdir().unwrap();
        let out = td.path().join("out");
        fs::create_dir_all(td.path().join("sub")).unwrap();
        fs::create_dir(&out).unwrap();
        fs::write(out.join("a.txt"), b"a").unwrap();
        let alias = td.path().join("sub").join("..").join("out").join("a.txt");
        assert!(same_location(&out.join("a.txt"), &alias));
        assert!(!same_location(&out.join("a.txt"), &out.join("b.txt")));
        assert!(!same_location(&out.join("a.txt"), &td.path().join("a.txt")));
    }

    #[test]
    fn same_entry_detects_identity() {
        let td = tempdir().unwrap();
        let a = td.path().join("a.txt");
        let b = td.path().join("b.txt");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();
        assert!(same_entry(&a, &a));
        assert!(!same_entry(&a, &b));
        assert!(!same_entry(&a, &td.path().join("missing")));
    }
}
