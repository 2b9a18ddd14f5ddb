//! Core data model: entries, criteria, destination policies and results.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::RelocateError;

/// One filesystem object produced by a scan. Never mutated; a new scan
/// replaces it after a relocation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: OsString,
    /// Text after the last dot of the name (without the dot). A leading dot
    /// (".env") is part of the name, not an extension.
    pub extension: Option<String>,
    pub is_file: bool,
}

impl FileEntry {
    /// Build an entry for `path`, reading its type from the filesystem
    /// (following symlinks, so a link to a regular file counts as a file).
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_file = path.is_file();
        Self::with_kind(path, is_file)
    }

    pub(crate) fn with_kind(path: PathBuf, is_file: bool) -> Self {
        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_default();
        let extension = split_name(&name.to_string_lossy())
            .1
            .map(|ext| ext.trim_start_matches('.').to_string());
        Self {
            path,
            name,
            extension,
            is_file,
        }
    }

    /// Name as text for matching; invalid UTF-8 is replaced.
    pub fn name_lossy(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// Directory containing the entry.
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Split a file name into `(stem, Some(".ext"))`. The dot must not be the
/// first character, so dotfiles have no extension.
pub(crate) fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx..])),
        _ => (name, None),
    }
}

/// User criterion selecting entries. Both variants compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCriterion {
    Substring(String),
    ExtensionSuffix(String),
}

/// How a rename treats the case of the resulting name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseHandling {
    /// Lower-case the whole resulting name.
    #[default]
    Lowercase,
    /// Keep the case of the characters that remain.
    Preserve,
}

impl CaseHandling {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowercase" | "lower" => Some(CaseHandling::Lowercase),
            "preserve" | "keep" => Some(CaseHandling::Preserve),
            _ => None,
        }
    }
}

impl fmt::Display for CaseHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CaseHandling::Lowercase => "lowercase",
            CaseHandling::Preserve => "preserve",
        })
    }
}

impl FromStr for CaseHandling {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid case handling: '{s}'"))
    }
}

/// Where matched entries end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationPolicy {
    /// Strip `remove` from the name, same directory.
    RenameInPlace { remove: String, case: CaseHandling },
    /// Keep the name, move into this directory (created if absent).
    MoveToFolder(PathBuf),
}

impl DestinationPolicy {
    pub fn rename_in_place(remove: impl Into<String>) -> Self {
        DestinationPolicy::RenameInPlace {
            remove: remove.into(),
            case: CaseHandling::default(),
        }
    }

    pub fn move_to_folder(dir: impl Into<PathBuf>) -> Self {
        DestinationPolicy::MoveToFolder(dir.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationStatus {
    Succeeded,
    Failed(RelocateError),
}

/// Outcome of relocating one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationResult {
    pub original: PathBuf,
    /// Path actually used, or that would have been used when the failure
    /// happened after collision resolution. Equals `original` otherwise.
    pub final_path: PathBuf,
    pub status: RelocationStatus,
}

impl RelocationResult {
    pub(crate) fn succeeded(original: &Path, final_path: PathBuf) -> Self {
        Self {
            original: original.to_path_buf(),
            final_path,
            status: RelocationStatus::Succeeded,
        }
    }

    pub(crate) fn failed(original: &Path, final_path: Option<PathBuf>, err: RelocateError) -> Self {
        Self {
            original: original.to_path_buf(),
            final_path: final_path.unwrap_or_else(|| original.to_path_buf()),
            status: RelocationStatus::Failed(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, RelocationStatus::Succeeded)
    }

    /// Succeeded without touching the filesystem.
    pub fn is_unchanged(&self) -> bool {
        self.is_success() && self.original == self.final_path
    }

    pub fn error(&self) -> Option<&RelocateError> {
        match &self.status {
            RelocationStatus::Failed(e) => Some(e),
            RelocationStatus::Succeeded => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_handles_dotfiles_and_multi_ext() {
        assert_eq!(split_name("movie.mkv"), ("movie", Some(".mkv")));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", Some(".gz")));
        assert_eq!(split_name(".env"), (".env", None));
        assert_eq!(split_name("README"), ("README", None));
    }

    #[test]
    fn entry_extension_excludes_dot() {
        let e = FileEntry::with_kind(PathBuf::from("/x/Clip.MP4"), true);
        assert_eq!(e.extension.as_deref(), Some("MP4"));
        assert_eq!(e.name, OsString::from("Clip.MP4"));
        assert_eq!(e.parent(), Path::new("/x"));
    }

    #[test]
    fn case_handling_parses() {
        assert_eq!(CaseHandling::parse("Preserve"), Some(CaseHandling::Preserve));
        assert_eq!("lowercase".parse::<CaseHandling>(), Ok(CaseHandling::Lowercase));
        assert!("upper".parse::<CaseHandling>().is_err());
    }
}
