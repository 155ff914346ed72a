//! Configuration discovery and effective settings resolution.
//!
//! yamend reads `yamend.toml|yaml|yml` from the scanned root or its closest
//! ancestor (stopping at a `.git` directory) and merges it with CLI flags to
//! produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `max_line_length`: 120
//! - `exclude_dirs` / `exclude_patterns`: see `discover`
//! - `fix.dry_run`: false
//! - `fix.backup`: true, `fix.backup_suffix`: `.backup`
//!
//! Overrides precedence: CLI > config file > defaults. CLI exclude entries
//! are appended to the configured (or default) lists.

use crate::backup::DEFAULT_BACKUP_SUFFIX;
use crate::discover::{DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_PATTERNS};
use crate::models::summary::Mode;
use crate::normalize::DEFAULT_MAX_LINE_LENGTH;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = ["yamend.toml", "yamend.yaml", "yamend.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Write-related configuration section under `[fix]`.
pub struct FixCfg {
    pub dry_run: Option<bool>,
    pub backup: Option<bool>,
    pub backup_suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `yamend.toml|yaml`.
pub struct YamendConfig {
    pub output: Option<String>,
    pub max_line_length: Option<usize>,
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub fix: Option<FixCfg>,
}

#[derive(Debug, Default, Clone)]
/// Values supplied on the command line. `None` defers to config/defaults.
pub struct Overrides {
    pub root: Option<String>,
    pub output: Option<String>,
    pub dry_run: Option<bool>,
    pub backup: Option<bool>,
    pub backup_suffix: Option<String>,
    pub max_line_length: Option<usize>,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: String,
    pub mode: Mode,
    pub backup_suffix: String,
    pub max_line_length: usize,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

/// Walk upward from `start` to the directory holding the config file.
///
/// Stops at the first directory containing a `yamend.*` file or a `.git`
/// directory; falls back to `start`.
pub fn detect_config_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `YamendConfig` from `yamend.toml` or `yamend.yaml|yml` if present.
///
/// A file that fails to parse is reported and ignored.
pub fn load_config(dir: &Path) -> Option<(PathBuf, YamendConfig)> {
    let path = CONFIG_FILES
        .iter()
        .map(|f| dir.join(f))
        .find(|p| p.is_file())?;
    let s = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("cannot read {}: {e}", path.display());
            return None;
        }
    };
    let parsed = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str::<YamendConfig>(&s).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<YamendConfig>(&s).map_err(|e| e.to_string())
    };
    match parsed {
        Ok(cfg) => Some((path, cfg)),
        Err(e) => {
            log::warn!("ignoring invalid config {}: {e}", path.display());
            None
        }
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: Overrides) -> Effective {
    let root = PathBuf::from(cli.root.as_deref().unwrap_or("."));
    let root = fs::canonicalize(&root).unwrap_or(root);
    let (config_path, cfg) = match load_config(&detect_config_root(&root)) {
        Some((p, c)) => (Some(p), c),
        None => (None, YamendConfig::default()),
    };
    let fix = cfg.fix.unwrap_or_default();

    let output = cli
        .output
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let dry_run = cli.dry_run.or(fix.dry_run).unwrap_or(false);
    let backup = cli.backup.or(fix.backup).unwrap_or(true);
    let mode = if dry_run {
        Mode::DryRun
    } else if backup {
        Mode::WriteWithBackup
    } else {
        Mode::WriteWithoutBackup
    };
    let backup_suffix = cli
        .backup_suffix
        .or(fix.backup_suffix)
        .unwrap_or_else(|| DEFAULT_BACKUP_SUFFIX.to_string());
    let max_line_length = cli
        .max_line_length
        .or(cfg.max_line_length)
        .unwrap_or(DEFAULT_MAX_LINE_LENGTH);

    let mut exclude_dirs = cfg
        .exclude_dirs
        .unwrap_or_else(|| DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect());
    exclude_dirs.extend(cli.exclude_dirs);
    let mut exclude_patterns = cfg.exclude_patterns.unwrap_or_else(|| {
        DEFAULT_EXCLUDED_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .collect()
    });
    exclude_patterns.extend(cli.exclude_patterns);

    Effective {
        root,
        config_path,
        output,
        mode,
        backup_suffix,
        max_line_length,
        exclude_dirs,
        exclude_patterns,
    }
}
