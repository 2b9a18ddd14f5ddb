//! I/O error description helpers.
//!
//! Renders an io::Error with the operation, the path and a platform-aware
//! hint so per-file failures in a report are actionable on their own.

use std::io;
use std::path::Path;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permissions)");
                }
                libc::EXDEV => {
                    msg.push_str(" (cross-filesystem; rename not possible)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; ensure no other process is using it)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path not found; verify it exists)");
                }
                libc::EEXIST => {
                    msg.push_str(" (already exists)");
                }
                libc::ENOSPC => {
                    msg.push_str(" (insufficient space on device)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem; cannot write here)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" (filename or path too long)");
                }
                libc::ENOTDIR => {
                    msg.push_str(" (a path component is not a directory)");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" (access denied; check permissions)"), // ERROR_ACCESS_DENIED
                17 => msg.push_str(" (not same device; cross-filesystem move)"), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str(" (sharing violation; file is in use)"), // ERROR_SHARING_VIOLATION
                2 | 3 => msg.push_str(" (path not found; verify it exists)"),
                80 | 183 => msg.push_str(" (already exists)"),
                112 => msg.push_str(" (insufficient disk space)"), // ERROR_DISK_FULL
                206 => msg.push_str(" (filename or path too long)"),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" (permission denied; check ownership and write permissions)");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" (path not found; verify it exists)");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" (already exists)");
            }
            _ => {}
        }
    }

    msg
}
