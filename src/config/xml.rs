//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request.
//!
//! Notes:
//! - A missing file is not an error; defaults apply.
//! - Unknown XML fields are rejected so typos surface instead of being ignored.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::scan::DEFAULT_MAX_DEPTH;
use crate::types::CaseHandling;

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    case: Option<String>,
    collect_base: Option<String>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    max_depth: Option<usize>,
    preserve_metadata: Option<bool>,
}

// Optional usize with surrounding whitespace trimmed; an empty element means
// unset, anything else that is not a number is an error.
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|e| serde::de::Error::custom(format!("invalid max_depth '{s}': {e}")))
        })
        .transpose()
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim).filter(|t| !t.is_empty()).map(PathBuf::from)
}

// Map XmlConfig -> Config, starting from defaults
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref() {
        cfg.log_level = s
            .trim()
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = non_empty_path(parsed.log_file.as_deref());
    if let Some(s) = parsed.case.as_deref() {
        cfg.case = s.parse::<CaseHandling>().map_err(anyhow::Error::msg)?;
    }
    if let Some(p) = non_empty_path(parsed.collect_base.as_deref()) {
        cfg.collect_base = Some(p);
    }
    if let Some(depth) = parsed.max_depth {
        if depth == 0 {
            bail!("max_depth must be at least 1");
        }
        cfg.max_depth = depth;
    }
    cfg.preserve_metadata = parsed.preserve_metadata.unwrap_or(false);
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the config from `$BULK_RELOCATE_CONFIG` or the default location.
/// Returns Ok(None) if the file does not exist.
pub fn load_config() -> Result<Option<Config>> {
    let Some(path) = default_config_path() else {
        debug!("no config directory available; using defaults");
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    load_config_from_xml_path(&path).map(Some)
}

/// Write a commented template config. Refuses to overwrite an existing
/// file or to write through a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let content = format!(
        "<!--\n  bulk_relocate configuration (XML)\n\n    log_level          -> quiet | normal | info | debug\n    log_file           -> path to a log file (optional)\n    case               -> lowercase | preserve (names produced by `strip`)\n    collect_base       -> base directory for relative `collect` folders\n    max_depth          -> recursion bound for recursive scans\n    preserve_metadata  -> copy permissions + timestamps on cross-device moves\n\n  CLI flags override these values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <case>lowercase</case>\n  <max_depth>{}</max_depth>\n  <preserve_metadata>false</preserve_metadata>\n</config>\n",
        DEFAULT_MAX_DEPTH
    );

    let mut f = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("create config file '{}'", path.display()))?;
    f.write_all(content.as_bytes())
        .with_context(|| format!("write config file '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}
