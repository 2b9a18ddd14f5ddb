//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/collect paths and detects symlinked
//! ancestors for log-file safety.

use dirs::{config_dir, download_dir, home_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

/// Config file location: `$BULK_RELOCATE_CONFIG` if set, else the
/// OS-appropriate default under the user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    if let Some(mut base) = config_dir() {
        base.push("bulk_relocate");
        base.push("config.xml");
        Some(base)
    } else {
        home_dir().map(|h| h.join(".config").join("bulk_relocate").join("config.xml"))
    }
}

/// Where relative `collect` folders land: the user's Downloads directory.
pub fn default_collect_base() -> Option<PathBuf> {
    download_dir().or_else(|| home_dir().map(|h| h.join("Downloads")))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_parent() {
        let td = tempfile::tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("app.log")).unwrap());
    }
}
