use bulk_relocate::cli::{Args, Command};
use bulk_relocate::config::types::{Config, LogLevel};
use bulk_relocate::{CaseHandling, DestinationPolicy, MatchCriterion};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn strip_parses_positionals_and_flags() {
    let args = Args::parse_from(["bulk_relocate", "strip", "/data", "_tmp", "--preserve-case", "-r"]);
    assert_eq!(
        args.command,
        Some(Command::Strip {
            root: PathBuf::from("/data"),
            text: "_tmp".into(),
            preserve_case: true,
            recursive: true,
        })
    );
}

#[test]
fn strip_case_follows_config_unless_flag_given() {
    let cfg = Config {
        case: CaseHandling::Preserve,
        ..Config::default()
    };
    let args = Args::parse_from(["bulk_relocate", "strip", "/data", "old"]);
    let round = args.command.unwrap().to_round(&cfg);
    assert_eq!(round.criterion, MatchCriterion::Substring("old".into()));
    assert_eq!(
        round.policy,
        DestinationPolicy::RenameInPlace {
            remove: "old".into(),
            case: CaseHandling::Preserve
        }
    );

    let args = Args::parse_from(["bulk_relocate", "strip", "/data", "old"]);
    let round = args.command.unwrap().to_round(&Config::default());
    assert!(matches!(
        round.policy,
        DestinationPolicy::RenameInPlace {
            case: CaseHandling::Lowercase,
            ..
        }
    ));
}

#[test]
fn collect_absolute_folder_ignores_collect_base() {
    let abs = std::env::temp_dir().join("gifs");
    let args = Args::parse_from(["bulk_relocate", "collect", "/data", ".gif", abs.to_str().unwrap()]);
    let round = args.command.unwrap().to_round(&Config::default());
    assert_eq!(round.criterion, MatchCriterion::ExtensionSuffix(".gif".into()));
    assert_eq!(round.policy, DestinationPolicy::MoveToFolder(abs));
}

#[test]
fn round_inherits_depth_and_metadata_from_config() {
    let cfg = Config {
        max_depth: 3,
        preserve_metadata: true,
        ..Config::default()
    };
    let args = Args::parse_from(["bulk_relocate", "group", "/data", "IMG", "photos", "--recursive"]);
    let round = args.command.unwrap().to_round(&cfg);
    assert!(round.scan.recursive);
    assert_eq!(round.scan.max_depth, 3);
    assert!(round.options.preserve_metadata);
}

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["bulk_relocate", "--debug", "--log-level", "quiet"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug)); // --debug wins

    let args = Args::parse_from(["bulk_relocate", "--log-level", "info"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    let args = Args::parse_from(["bulk_relocate", "--log-level", "loud"]);
    assert_eq!(args.effective_log_level(), None);
}

#[test]
fn apply_overrides_sets_flags() {
    let args = Args::parse_from([
        "bulk_relocate",
        "--log-level",
        "info",
        "--dry-run",
        "--preserve-metadata",
        "-y",
        "strip",
        "/data",
        "x",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert!(cfg.dry_run);
    assert!(cfg.preserve_metadata);
    assert!(cfg.assume_yes);
}

#[test]
fn apply_overrides_leaves_unset_values() {
    let args = Args::parse_from(["bulk_relocate", "strip", "/data", "x"]);
    let mut cfg = Config {
        log_level: LogLevel::Quiet,
        preserve_metadata: true,
        ..Config::default()
    };
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.log_level, LogLevel::Quiet);
    assert!(cfg.preserve_metadata);
    assert!(!cfg.dry_run);
}
