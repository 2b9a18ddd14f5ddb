//! Core library for `bulk_relocate`.
//!
//! Finds files under a root whose names match a criterion and renames or
//! moves them without ever overwriting an existing file.
//!
//! Modules:
//! - `scan` / `predicate`: enumerate a directory and select entries.
//! - `fs_ops`: collision resolution, planning and the relocation itself.
//! - `session`: one scan -> preview -> confirm -> relocate round.
//! - `config`: defaults, XML loading and paths.
//! - `cli` / `output`: argument parsing and user-facing lines.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod predicate;
pub mod scan;
pub mod session;
pub mod types;

pub use config::types::{Config, LogLevel};
pub use config::{
    CONFIG_ENV, create_template_config, default_collect_base, default_config_path, load_config,
    load_config_from_xml_path, path_has_symlink_ancestor,
};
pub use errors::RelocateError;
pub use fs_ops::{PlannedRelocation, Reservations, desired_path, plan, relocate, relocate_with, resolve};
pub use predicate::matches;
pub use scan::{Scan, ScanOptions, scan, scan_with};
pub use session::{Round, RoundOutcome, RoundReport};
pub use types::{
    CaseHandling, DestinationPolicy, FileEntry, MatchCriterion, RelocationResult, RelocationStatus,
};
