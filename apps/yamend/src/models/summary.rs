//! Per-file outcomes and the process-wide run accumulator.
//!
//! `RunSummary` is created once at batch start, fed one `FileOutcome` per
//! processed file by the runner, and read by the printers at batch end.

use super::{ChangeTally, FixKind, LongLine};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// How corrected content is handled.
pub enum Mode {
    /// Compute fixes, write nothing.
    DryRun,
    /// Copy the original to a sibling backup, then overwrite.
    WriteWithBackup,
    /// Overwrite in place.
    WriteWithoutBackup,
}

impl Mode {
    pub fn writes(self) -> bool {
        !matches!(self, Mode::DryRun)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::DryRun => "DRY RUN",
            Mode::WriteWithBackup | Mode::WriteWithoutBackup => "WRITE",
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Result of processing a single file.
pub struct FileOutcome {
    pub path: PathBuf,
    pub tally: ChangeTally,
    pub long_lines: Vec<LongLine>,
    /// False when the corrected content failed the YAML parse check.
    pub valid_yaml: bool,
    pub wrote: bool,
    pub backup: Option<PathBuf>,
    /// Set when the file was skipped because of an I/O fault.
    pub error: Option<String>,
    /// Unified diff of the proposed change, only computed when requested.
    pub diff: Option<String>,
}

impl FileOutcome {
    pub fn unchanged(path: &Path) -> Self {
        FileOutcome {
            path: path.to_path_buf(),
            valid_yaml: true,
            ..Default::default()
        }
    }

    pub fn failed(path: &Path, error: String) -> Self {
        FileOutcome {
            error: Some(error),
            ..FileOutcome::unchanged(path)
        }
    }

    pub fn changed(&self) -> bool {
        !self.tally.is_empty()
    }
}

#[derive(Debug)]
/// Aggregated results across all files of one run.
pub struct RunSummary {
    pub root: PathBuf,
    pub mode: Mode,
    pub backup_suffix: Option<String>,
    pub files_processed: usize,
    pub files_changed: usize,
    /// Files actually overwritten on disk.
    pub files_written: usize,
    /// Backup copies created in write-with-backup mode.
    pub backups: Vec<PathBuf>,
    /// Files (with counts) per kind, in processing order.
    pub changes: BTreeMap<FixKind, Vec<(PathBuf, usize)>>,
    pub long_lines: Vec<(PathBuf, LongLine)>,
    pub validation_warnings: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, String)>,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn new(root: &Path, mode: Mode, backup_suffix: Option<String>) -> Self {
        RunSummary {
            root: root.to_path_buf(),
            mode,
            backup_suffix,
            files_processed: 0,
            files_changed: 0,
            files_written: 0,
            backups: Vec::new(),
            changes: BTreeMap::new(),
            long_lines: Vec::new(),
            validation_warnings: Vec::new(),
            errors: Vec::new(),
            interrupted: false,
        }
    }

    /// Fold one file's outcome into the totals.
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_processed += 1;
        if let Some(err) = &outcome.error {
            self.errors.push((outcome.path.clone(), err.clone()));
        }
        for ll in &outcome.long_lines {
            self.long_lines.push((outcome.path.clone(), *ll));
        }
        if !outcome.changed() {
            return;
        }
        self.files_changed += 1;
        if outcome.wrote {
            self.files_written += 1;
        }
        if let Some(b) = &outcome.backup {
            self.backups.push(b.clone());
        }
        if !outcome.valid_yaml {
            self.validation_warnings.push(outcome.path.clone());
        }
        for (kind, n) in outcome.tally.iter() {
            self.changes
                .entry(kind)
                .or_default()
                .push((outcome.path.clone(), n));
        }
    }

    /// Sum of changes of one kind across all files.
    pub fn kind_total(&self, kind: FixKind) -> usize {
        self.changes
            .get(&kind)
            .map(|files| files.iter().map(|(_, n)| n).sum())
            .unwrap_or(0)
    }

    /// Path relative to the run root for display.
    pub fn display_path(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.root)
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .to_string()
    }
}
