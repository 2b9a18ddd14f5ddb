//! One relocation round: scan -> match -> preview -> confirm -> relocate.
//!
//! The round holds its inputs only; nothing survives between rounds except
//! the filesystem itself. Confirmation is a trait so the CLI can prompt on
//! stdin while tests and `--yes` answer automatically.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::errors::RelocateError;
use crate::fs_ops::{PlannedRelocation, RelocateOptions, plan, relocate_with};
use crate::predicate::matches;
use crate::scan::{ScanOptions, scan_with};
use crate::types::{DestinationPolicy, FileEntry, MatchCriterion, RelocationResult};

/// Decides whether a previewed plan goes ahead.
pub trait Confirm {
    fn confirm(&mut self, plan: &[PlannedRelocation]) -> bool;
}

/// Always proceeds (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _plan: &[PlannedRelocation]) -> bool {
        true
    }
}

/// Asks "proceed? (y/n)" on a writer and reads the answer from a reader.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

/// Prompt on the terminal.
pub fn stdin_confirm() -> PromptConfirm<io::StdinLock<'static>, io::Stdout> {
    PromptConfirm::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, plan: &[PlannedRelocation]) -> bool {
        let _ = write!(self.output, "Proceed with {} file(s)? (y/n): ", plan.len());
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => line.trim().eq_ignore_ascii_case("y"),
            Err(e) => {
                warn!(error = %e, "could not read confirmation; treating as no");
                false
            }
        }
    }
}

/// Inputs for one round.
#[derive(Debug, Clone)]
pub struct Round {
    pub root: PathBuf,
    pub criterion: MatchCriterion,
    pub policy: DestinationPolicy,
    pub scan: ScanOptions,
    pub options: RelocateOptions,
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Nothing matched the criterion.
    NoMatches,
    /// Plan produced but not executed (dry-run).
    Previewed,
    /// Confirmation declined.
    Declined,
    /// Relocations attempted.
    Completed,
}

#[derive(Debug, Clone)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub plan: Vec<PlannedRelocation>,
    /// Per-file results in processing order.
    pub results: Vec<RelocationResult>,
}

impl RoundReport {
    fn empty(outcome: RoundOutcome, plan: Vec<PlannedRelocation>) -> Self {
        Self {
            outcome,
            plan,
            results: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success() && !r.is_unchanged()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.results.iter().filter(|r| r.is_unchanged()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

impl Round {
    pub fn new(root: impl Into<PathBuf>, criterion: MatchCriterion, policy: DestinationPolicy) -> Self {
        Self {
            root: root.into(),
            criterion,
            policy,
            scan: ScanOptions::default(),
            options: RelocateOptions::default(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.scan.recursive = recursive;
        self
    }

    /// Scan and filter; the list is materialized so relocations cannot feed
    /// back into the walk. Entries already sitting directly in a
    /// MoveToFolder target are left out.
    pub fn matched_entries(&self) -> Result<Vec<FileEntry>, RelocateError> {
        let target = match &self.policy {
            DestinationPolicy::MoveToFolder(dir) => Some(dunce::canonicalize(dir).unwrap_or_else(|_| dir.clone())),
            DestinationPolicy::RenameInPlace { .. } => None,
        };
        let entries = scan_with(&self.root, self.scan)?
            .filter(|e| matches(e, &self.criterion))
            .filter(|e| {
                let in_target = target.as_deref() == Some(e.parent());
                if in_target {
                    debug!(path = %e.path.display(), "already in target folder; skipping");
                }
                !in_target
            })
            .collect();
        Ok(entries)
    }

    /// Preview only: the plan for the current matches.
    pub fn preview(&self) -> Result<Vec<PlannedRelocation>, RelocateError> {
        Ok(plan(&self.matched_entries()?, &self.policy))
    }

    /// Run the round. Scan errors abort before any mutation; per-file
    /// failures are recorded and the round carries on.
    pub fn run(&self, confirm: &mut dyn Confirm, dry_run: bool) -> Result<RoundReport, RelocateError> {
        let entries = self.matched_entries()?;
        if entries.is_empty() {
            info!(root = %self.root.display(), criterion = ?self.criterion, "no files matched");
            return Ok(RoundReport::empty(RoundOutcome::NoMatches, Vec::new()));
        }

        let planned = plan(&entries, &self.policy);
        if dry_run {
            return Ok(RoundReport::empty(RoundOutcome::Previewed, planned));
        }
        if !confirm.confirm(&planned) {
            info!("relocation declined");
            return Ok(RoundReport::empty(RoundOutcome::Declined, planned));
        }

        let results: Vec<RelocationResult> = entries
            .iter()
            .map(|entry| relocate_with(entry, &self.policy, &self.options))
            .collect();
        let report = RoundReport {
            outcome: RoundOutcome::Completed,
            plan: planned,
            results,
        };
        info!(
            succeeded = report.succeeded(),
            unchanged = report.unchanged(),
            failed = report.failed(),
            "round complete"
        );
        Ok(report)
    }
}
