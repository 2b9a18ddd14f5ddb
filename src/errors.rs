//! Typed error definitions for bulk_relocate.
//! Provides the small set of failure modes a relocation round can report.
//!
//! Variants hold rendered messages rather than `io::Error` so results can be
//! cloned into reports and compared in tests.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fs_ops::helpers::describe_io_error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelocateError {
    /// Scan root missing or not a directory (also used for a MoveToFolder
    /// target that exists as a file). Fatal to a round when raised by scan.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Stripping the text left nothing of the file name.
    #[error("Renaming '{name}' would produce an empty name")]
    EmptyResult { name: String },

    /// Entry vanished between scan and relocation.
    #[error("Source path not found: {0}")]
    NotFound(PathBuf),

    #[error("Permission denied on {path}: {context}")]
    PermissionDenied { path: PathBuf, context: String },

    /// Destination occupied at mutation time. Only reachable if another
    /// process raced us past the collision resolver.
    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),

    /// File name cannot be treated as text for a rename.
    #[error("File name is not valid UTF-8: {0}")]
    UnsupportedName(PathBuf),

    #[error("{0}")]
    Io(String),
}

impl RelocateError {
    /// Stable numeric code for logs and exit statuses.
    pub fn code(&self) -> i32 {
        match self {
            RelocateError::NotADirectory(_) => 2,
            RelocateError::EmptyResult { .. } => 3,
            RelocateError::NotFound(_) => 4,
            RelocateError::PermissionDenied { .. } => 5,
            RelocateError::AlreadyExists(_) => 6,
            RelocateError::UnsupportedName(_) => 7,
            RelocateError::Io(_) => 10,
        }
    }

    /// Short machine-friendly name used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RelocateError::NotADirectory(_) => "not_a_directory",
            RelocateError::EmptyResult { .. } => "empty_result",
            RelocateError::NotFound(_) => "not_found",
            RelocateError::PermissionDenied { .. } => "permission_denied",
            RelocateError::AlreadyExists(_) => "already_exists",
            RelocateError::UnsupportedName(_) => "unsupported_name",
            RelocateError::Io(_) => "io",
        }
    }

    /// Classify an I/O failure of `op` on `path`.
    pub fn from_io(op: &str, path: &Path, e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => RelocateError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => RelocateError::PermissionDenied {
                path: path.to_path_buf(),
                context: describe_io_error(op, path, e),
            },
            io::ErrorKind::AlreadyExists => RelocateError::AlreadyExists(path.to_path_buf()),
            _ => RelocateError::Io(describe_io_error(op, path, e)),
        }
    }
}
