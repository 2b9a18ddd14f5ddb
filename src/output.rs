//! User-facing terminal output.
//!
//! Prefixed status lines plus the preview and report renderers. Colours are
//! used only when stdout is a TTY. Status lines and results go to stdout,
//! warnings and errors to stderr; logs never go to stdout.

use owo_colors::OwoColorize;
use std::path::Path;

use crate::fs_ops::PlannedRelocation;
use crate::types::{RelocationResult, RelocationStatus};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Show `path` relative to `base` when it lives under it.
fn short<'a>(path: &'a Path, base: &Path) -> std::borrow::Cow<'a, str> {
    path.strip_prefix(base).unwrap_or(path).to_string_lossy()
}

/// One preview line: "  src -> dest" or "  src (reason)".
pub fn plan_line(item: &PlannedRelocation, base: &Path) -> String {
    let src = short(&item.source, base);
    match &item.destination {
        Ok(_) if item.is_noop() => format!("  {src} (unchanged)"),
        Ok(dest) => format!("  {src} -> {}", short(dest, base)),
        Err(e) => format!("  {src} (skipped: {e})"),
    }
}

/// One report line, scriptable: "Moved: a -> b" / "Failed: a: reason".
pub fn result_line(result: &RelocationResult, base: &Path) -> String {
    let src = short(&result.original, base);
    match &result.status {
        RelocationStatus::Succeeded if result.is_unchanged() => format!("Unchanged: {src}"),
        RelocationStatus::Succeeded => format!("Moved: {src} -> {}", short(&result.final_path, base)),
        RelocationStatus::Failed(e) => format!("Failed: {src}: {e}"),
    }
}

pub fn print_plan(plan: &[PlannedRelocation], base: &Path) {
    for item in plan {
        println!("{}", plan_line(item, base));
    }
}

pub fn print_result(result: &RelocationResult, base: &Path) {
    let line = result_line(result, base);
    if !result.is_success() {
        if is_tty() {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{}", line);
        }
    } else {
        println!("{}", line);
    }
}
