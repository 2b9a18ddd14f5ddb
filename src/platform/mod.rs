//! Platform-specific helpers.
//! Hides OS differences behind a uniform API.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Open a log file for appending. On Unix a newly created file gets mode
/// 0600; an existing file keeps its permissions.
#[cfg(unix)]
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)
}

#[cfg(not(unix))]
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
