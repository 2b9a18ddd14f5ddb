//! Application orchestrator.
//! Loads/merges config, initializes logging, builds the round from the
//! subcommand, previews, confirms and reports.

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, error, info};

use bulk_relocate::cli::{Args, Command};
use bulk_relocate::output as out;
use bulk_relocate::session::{AssumeYes, Confirm, RoundOutcome, RoundReport, stdin_confirm};
use bulk_relocate::{CONFIG_ENV, Config, create_template_config, default_config_path, load_config};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config / --init-config before logging init
    if args.print_config {
        return print_config_location();
    }
    if args.init_config {
        let path = default_config_path().ok_or_else(|| anyhow!("could not determine a config path"))?;
        create_template_config(&path)?;
        out::print_success(&format!("A template bulk_relocate config was written to: {}", path.display()));
        return Ok(());
    }

    let Some(command) = args.command.clone() else {
        bail!("no command given; see --help");
    };

    // Build config (may read XML). CLI args override config values.
    let mut cfg = match load_config() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => Config::default(),
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            return Err(e);
        }
    };
    args.apply_overrides(&mut cfg);

    // Guard must live until exit so the file appender flushes.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    debug!("Starting bulk_relocate: {:?}", args);
    run_round(&command, &cfg)
}

fn print_config_location() -> Result<()> {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return Ok(());
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default bulk_relocate config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
    Ok(())
}

fn run_round(command: &Command, cfg: &Config) -> Result<()> {
    let round = command.to_round(cfg);
    // Scanned paths are canonical; shorten report lines against the same form.
    let base = dunce::canonicalize(&round.root).unwrap_or_else(|_| round.root.clone());
    let base = base.as_path();

    let mut confirm: Box<dyn Confirm> = if cfg.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(PreviewThenPrompt { base: base.to_path_buf() })
    };

    let report = match round.run(confirm.as_mut(), cfg.dry_run) {
        Ok(report) => report,
        Err(e) => {
            error!(code = e.code(), kind = e.kind(), root = %base.display(), "Scan failed");
            out::print_error(&e.to_string());
            return Err(e).with_context(|| format!("scan of '{}' failed", base.display()));
        }
    };

    summarize(&report, base)
}

/// Shows the plan, then asks on the terminal.
struct PreviewThenPrompt {
    base: std::path::PathBuf,
}

impl Confirm for PreviewThenPrompt {
    fn confirm(&mut self, plan: &[bulk_relocate::PlannedRelocation]) -> bool {
        out::print_info(&format!("{} file(s) will be relocated:", plan.len()));
        out::print_plan(plan, &self.base);
        stdin_confirm().confirm(plan)
    }
}

fn summarize(report: &RoundReport, base: &std::path::Path) -> Result<()> {
    match report.outcome {
        RoundOutcome::NoMatches => {
            out::print_info("No files matched.");
            Ok(())
        }
        RoundOutcome::Previewed => {
            out::print_info(&format!("Dry-run: {} file(s) would be relocated:", report.plan.len()));
            out::print_plan(&report.plan, base);
            Ok(())
        }
        RoundOutcome::Declined => {
            out::print_info("Cancelled; nothing was changed.");
            Ok(())
        }
        RoundOutcome::Completed => {
            for result in &report.results {
                out::print_result(result, base);
            }
            let (moved, unchanged, failed) = (report.succeeded(), report.unchanged(), report.failed());
            info!(moved, unchanged, failed, "Summary");
            if failed > 0 {
                out::print_error(&format!("{moved} relocated, {unchanged} unchanged, {failed} failed"));
                bail!("{failed} file(s) could not be relocated");
            }
            out::print_success(&format!("{moved} relocated, {unchanged} unchanged"));
            Ok(())
        }
    }
}
