//! YAML file discovery under a root directory.
//!
//! Excluded directories are pruned during the walk. An entry without `/`
//! matches any directory of that name; an entry with `/` (e.g.
//! `tests/output`) matches a root-relative directory path ending with it.
//! Exclude globs are tested against the file name and the root-relative path.

use crate::error::FixError;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

pub const DEFAULT_EXCLUDED_DIRS: [&str; 13] = [
    ".cache",
    ".git",
    ".gitlab-ci",
    ".tox",
    ".venv",
    "molecule",
    ".vagrant",
    ".ansible",
    ".pytest_cache",
    "__pycache__",
    ".mypy_cache",
    "tests/output",
    "changelogs/fragments",
];

pub const DEFAULT_EXCLUDED_PATTERNS: [&str; 3] = ["*.tar.gz", "*.pyc", "*.pyo"];

/// Compiled exclusion rules.
pub struct Excludes {
    dirs: Vec<String>,
    patterns: Vec<Pattern>,
}

impl Excludes {
    pub fn new(dirs: &[String], patterns: &[String]) -> Result<Self, FixError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| FixError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dirs = dirs
            .iter()
            .map(|d| d.trim_matches('/').to_string())
            .filter(|d| !d.is_empty())
            .collect();
        Ok(Excludes { dirs, patterns })
    }

    fn excludes_dir(&self, rel: &str, name: &str) -> bool {
        self.dirs.iter().any(|d| {
            if d.contains('/') {
                rel == d.as_str() || rel.ends_with(&format!("/{d}"))
            } else {
                name == d.as_str()
            }
        })
    }

    fn excludes_file(&self, rel: &str, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(name) || p.matches(rel))
    }
}

fn rel_str(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| YAML_EXTENSIONS.iter().any(|y| e.eq_ignore_ascii_case(y)))
        .unwrap_or(false)
}

/// Recursively collect `.yml`/`.yaml` files under `root`, sorted by path.
pub fn find_yaml_files(root: &Path, excludes: &Excludes) -> Result<Vec<PathBuf>, FixError> {
    let keep = |entry: &DirEntry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !excludes.excludes_dir(&rel_str(root, entry.path()), &name)
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(keep) {
        let entry = match entry {
            Ok(e) => e,
            // Only an unreadable root is fatal; deeper failures skip the entry.
            Err(source) if source.depth() == 0 => {
                return Err(FixError::Walk {
                    path: root.to_path_buf(),
                    source,
                })
            }
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_yaml(entry.path()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if excludes.excludes_file(&rel_str(root, entry.path()), &name) {
            log::debug!("excluded by pattern: {}", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    Ok(files)
}
