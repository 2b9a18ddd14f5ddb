//! Metadata preservation for the copy fallback.
//! Copies timestamps and (on Unix) the permission bits from the source.
//! Best-effort: failures are logged and ignored.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

pub(super) fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) {
    let at = src_meta.accessed().ok().map(FileTime::from_system_time);
    let mt = FileTime::from_last_modification_time(src_meta);
    let at = at.unwrap_or(mt);
    if let Err(e) = set_file_times(dest, at, mt) {
        warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination");
    } else {
        trace!(path = %dest.display(), "set atime/mtime on destination");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o777;
        if let Err(e) = fs::set_permissions(dest, fs::Permissions::from_mode(mode)) {
            warn!(path = %dest.display(), mode = format!("{:o}", mode), error = %e, "failed to set permissions on destination");
        }
    }
    #[cfg(not(unix))]
    {
        if src_meta.permissions().readonly() {
            if let Ok(meta) = fs::metadata(dest) {
                let mut perms = meta.permissions();
                perms.set_readonly(true);
                if let Err(e) = fs::set_permissions(dest, perms) {
                    warn!(path = %dest.display(), error = %e, "failed to set readonly on destination");
                }
            }
        }
    }
}
