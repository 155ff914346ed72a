//! Sibling backup copies taken before a file is overwritten.

use crate::error::FixError;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

/// `roles/x/main.yml` + `.backup` -> `roles/x/main.yml.backup`.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Copy the original bytes of `path` next to it. An existing backup is
/// replaced.
pub fn create_backup(path: &Path, suffix: &str) -> Result<PathBuf, FixError> {
    let dst = backup_path(path, suffix);
    fs::copy(path, &dst).map_err(|source| FixError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(dst)
}
