//! CLI definition and parsing.
//! Defines Args and the three round commands, and turns them into a Round.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - `group` folders are relative to ROOT; `collect` folders are relative to
//!   the configured collect base (falling back to ROOT) unless absolute.

use clap::{Parser, Subcommand, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel};
use crate::session::Round;
use crate::types::{CaseHandling, DestinationPolicy, MatchCriterion};

/// Find files by name and rename or move them in bulk.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Find files by name and rename or move them in bulk"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long, global = true, help = "Do not ask for confirmation")]
    pub yes: bool,

    /// Dry-run: print the plan but do not modify the filesystem.
    #[arg(
        long,
        global = true,
        help = "Show what would be done, but do not modify files"
    )]
    pub dry_run: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Copy permissions and timestamps when a move has to fall back to copying.
    #[arg(
        long,
        global = true,
        help = "Preserve permissions and timestamps on cross-device moves"
    )]
    pub preserve_metadata: bool,

    /// Print the config file location in use, then exit.
    #[arg(long, help = "Print the config file location used by bulk_relocate and exit")]
    pub print_config: bool,

    /// Write a commented template config to the config location, then exit.
    #[arg(long, help = "Write a template config file and exit")]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Remove TEXT from the names of files containing it.
    Strip {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        #[arg(value_parser = non_empty)]
        text: String,
        /// Keep the case of the remaining characters instead of lower-casing.
        #[arg(long)]
        preserve_case: bool,
        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
    },
    /// Move files whose names contain TEXT into ROOT/FOLDER.
    Group {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        #[arg(value_parser = non_empty)]
        text: String,
        folder: PathBuf,
        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
    },
    /// Gather files ending in EXT from the whole tree into FOLDER.
    Collect {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        #[arg(value_parser = non_empty)]
        ext: String,
        folder: PathBuf,
        /// Only look at files directly inside ROOT.
        #[arg(long)]
        shallow: bool,
    },
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

impl Command {
    pub fn root(&self) -> &Path {
        match self {
            Command::Strip { root, .. } | Command::Group { root, .. } | Command::Collect { root, .. } => root.as_path(),
        }
    }

    /// Build the round for this command. `cfg` supplies case handling,
    /// the collect base, depth bound and metadata preference.
    pub fn to_round(&self, cfg: &Config) -> Round {
        let (criterion, policy, recursive) = match self {
            Command::Strip {
                text,
                preserve_case,
                recursive,
                ..
            } => {
                let case = if *preserve_case { CaseHandling::Preserve } else { cfg.case };
                (
                    MatchCriterion::Substring(text.clone()),
                    DestinationPolicy::RenameInPlace {
                        remove: text.clone(),
                        case,
                    },
                    *recursive,
                )
            }
            Command::Group {
                root,
                text,
                folder,
                recursive,
            } => (
                MatchCriterion::Substring(text.clone()),
                DestinationPolicy::MoveToFolder(root.join(folder)),
                *recursive,
            ),
            Command::Collect {
                root,
                ext,
                folder,
                shallow,
            } => {
                let target = if folder.is_absolute() {
                    folder.clone()
                } else {
                    cfg.collect_base.as_deref().unwrap_or(root.as_path()).join(folder)
                };
                (
                    MatchCriterion::ExtensionSuffix(ext.clone()),
                    DestinationPolicy::MoveToFolder(target),
                    !*shallow,
                )
            }
        };
        let mut round = Round::new(self.root(), criterion, policy).recursive(recursive);
        round.scan.max_depth = cfg.max_depth;
        round.options.preserve_metadata = cfg.preserve_metadata;
        round
    }
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.yes {
            cfg.assume_yes = true;
        }
        if self.preserve_metadata {
            cfg.preserve_metadata = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
