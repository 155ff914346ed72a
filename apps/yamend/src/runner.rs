//! Batch runner: discovers YAML files and normalizes them one at a time.
//!
//! Each file is fully read, fully normalized in memory, then (in write modes)
//! backed up and fully written before the next file starts. Any fault inside
//! a single file is logged and that file is reported with zero changes; only
//! setup problems (bad root, bad exclude glob) abort the run.

use crate::backup;
use crate::discover::{self, Excludes};
use crate::error::FixError;
use crate::models::summary::{FileOutcome, Mode, RunSummary};
use crate::normalize::{validate_yaml, Normalizer};
use crate::output;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Settings for one run.
pub struct RunOptions {
    pub mode: Mode,
    pub backup_suffix: String,
    pub max_line_length: usize,
    pub excludes: Excludes,
    /// Render a unified diff for every changed file.
    pub diff: bool,
}

/// Reject roots that are missing or not directories.
pub fn validate_root(root: &Path) -> Result<(), FixError> {
    if !root.exists() {
        return Err(FixError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(FixError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Process every YAML file under `root` in sorted order.
///
/// `on_file` sees each outcome as soon as the file is done. When `cancel`
/// becomes true the run stops before the next file and the summary is
/// marked as interrupted.
pub fn run(
    root: &Path,
    opts: &RunOptions,
    cancel: &AtomicBool,
    mut on_file: impl FnMut(&FileOutcome),
) -> Result<RunSummary, FixError> {
    validate_root(root)?;
    let files = discover::find_yaml_files(root, &opts.excludes)?;
    log::info!("Found {} YAML files to process", files.len());
    if !opts.mode.writes() {
        log::info!("Running in DRY RUN mode - no files will be modified");
    }

    let suffix = (opts.mode == Mode::WriteWithBackup).then(|| opts.backup_suffix.clone());
    let mut summary = RunSummary::new(root, opts.mode, suffix);
    for path in files {
        if cancel.load(Ordering::SeqCst) {
            log::warn!("Operation cancelled by user");
            summary.interrupted = true;
            break;
        }
        let outcome = process_file(root, &path, opts);
        on_file(&outcome);
        summary.record(&outcome);
    }
    Ok(summary)
}

/// Normalize one file. Never fails: faults become a zero-change outcome.
pub fn process_file(root: &Path, path: &Path, opts: &RunOptions) -> FileOutcome {
    match try_process_file(root, path, opts) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Error processing {}: {e}", path.display());
            FileOutcome::failed(path, e.to_string())
        }
    }
}

fn try_process_file(root: &Path, path: &Path, opts: &RunOptions) -> Result<FileOutcome, FixError> {
    let io_err = |source| FixError::Io {
        path: path.to_path_buf(),
        source,
    };
    let original = fs::read_to_string(path).map_err(io_err)?;
    let fixed = Normalizer::new(opts.max_line_length).normalize(&original);

    for ll in &fixed.long_lines {
        log::warn!(
            "{}:{}: line too long ({} > {})",
            path.display(),
            ll.line,
            ll.width,
            opts.max_line_length
        );
    }

    let mut outcome = FileOutcome::unchanged(path);
    outcome.long_lines = fixed.long_lines.clone();
    if !fixed.changed() {
        return Ok(outcome);
    }
    outcome.tally = fixed.tally.clone();

    if let Err(e) = validate_yaml(&fixed.content) {
        // Extended syntax (custom tags, templating) may not parse; the
        // line-level fixes are still applied.
        log::warn!(
            "Fixed content may contain advanced YAML features that can't be validated: {}: {e}",
            path.display()
        );
        outcome.valid_yaml = false;
    }
    if opts.diff {
        let rel = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
        outcome.diff = Some(output::unified_diff(
            &original,
            &fixed.content,
            &rel.to_string_lossy(),
        ));
    }

    match opts.mode {
        Mode::DryRun => {
            log::info!("Would fix {}: {} changes", path.display(), fixed.tally.total());
            return Ok(outcome);
        }
        Mode::WriteWithBackup => {
            outcome.backup = Some(backup::create_backup(path, &opts.backup_suffix)?);
        }
        Mode::WriteWithoutBackup => {}
    }
    fs::write(path, &fixed.content).map_err(io_err)?;
    outcome.wrote = true;
    log::info!("Fixed {}: {} changes", path.display(), fixed.tally.total());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FixKind;
    use tempfile::tempdir;

    const DIRTY: &str = "#cmt\nkey:   value   \nlist:\n-   a\n-b\n";
    const CLEAN: &str = "---\n# cmt\nkey: value\nlist:\n- a\n- b\n";

    fn opts(mode: Mode) -> RunOptions {
        RunOptions {
            mode,
            backup_suffix: ".backup".into(),
            max_line_length: 120,
            excludes: Excludes::new(&["molecule".into()], &[]).unwrap(),
            diff: false,
        }
    }

    fn seed(root: &Path) {
        fs::create_dir_all(root.join("roles/web/tasks")).unwrap();
        fs::create_dir_all(root.join("molecule")).unwrap();
        fs::write(root.join("roles/web/tasks/main.yml"), DIRTY).unwrap();
        fs::write(root.join("clean.yml"), CLEAN).unwrap();
        fs::write(root.join("molecule/skip.yml"), DIRTY).unwrap();
    }

    fn run_quiet(root: &Path, o: &RunOptions) -> RunSummary {
        run(root, o, &AtomicBool::new(false), |_| {}).unwrap()
    }

    #[test]
    fn test_write_with_backup() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        seed(root);
        let mut outcomes = Vec::new();
        let summary = run(root, &opts(Mode::WriteWithBackup), &AtomicBool::new(false), |o| {
            outcomes.push(o.clone())
        })
        .unwrap();
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.files_written, 1);
        let fixed = outcomes
            .iter()
            .find(|o| o.path.ends_with("roles/web/tasks/main.yml"))
            .unwrap();
        assert!(fixed.wrote);
        assert_eq!(
            fixed.backup.as_deref(),
            Some(root.join("roles/web/tasks/main.yml.backup").as_path())
        );
        assert_eq!(summary.backups.len(), 1);
        assert!(outcomes.iter().all(|o| o.path == fixed.path || !o.wrote));
        assert_eq!(summary.kind_total(FixKind::YamlStructure), 3);

        let target = root.join("roles/web/tasks/main.yml");
        assert_eq!(fs::read_to_string(&target).unwrap(), CLEAN);
        assert_eq!(
            fs::read_to_string(root.join("roles/web/tasks/main.yml.backup")).unwrap(),
            DIRTY
        );
        // clean and excluded files untouched, no stray backups
        assert!(!root.join("clean.yml.backup").exists());
        assert_eq!(fs::read_to_string(root.join("molecule/skip.yml")).unwrap(), DIRTY);

        // second run finds nothing left to fix
        let again = run_quiet(root, &opts(Mode::WriteWithoutBackup));
        assert_eq!(again.files_changed, 0);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        seed(root);
        let mut o = opts(Mode::DryRun);
        o.diff = true;
        let mut diffs = Vec::new();
        let summary = run(root, &o, &AtomicBool::new(false), |out| {
            if let Some(d) = &out.diff {
                diffs.push(d.clone());
            }
        })
        .unwrap();
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.files_written, 0);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].contains("+- b"));
        // headers are root-relative so the preview applies with `git apply`
        assert!(diffs[0].starts_with("--- a/roles/web/tasks/main.yml\n"));
        assert!(diffs[0].contains("+++ b/roles/web/tasks/main.yml\n"));
        let target = root.join("roles/web/tasks/main.yml");
        assert_eq!(fs::read_to_string(&target).unwrap(), DIRTY);
        assert!(!root.join("roles/web/tasks/main.yml.backup").exists());
    }

    #[test]
    fn test_write_without_backup() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        seed(root);
        let summary = run_quiet(root, &opts(Mode::WriteWithoutBackup));
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.files_written, 1);
        assert!(summary.backups.is_empty());
        assert!(!root.join("roles/web/tasks/main.yml.backup").exists());
        assert_eq!(
            fs::read_to_string(root.join("roles/web/tasks/main.yml")).unwrap(),
            CLEAN
        );
    }

    #[test]
    fn test_bad_file_does_not_abort_batch() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.yml"), [0xff, 0xfe, b'\n']).unwrap();
        fs::write(root.join("b.yml"), "key:value\n").unwrap();
        let summary = run_quiet(root, &opts(Mode::WriteWithoutBackup));
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(
            fs::read_to_string(root.join("b.yml")).unwrap(),
            "---\nkey: value\n"
        );
    }

    #[test]
    fn test_invalid_yaml_is_still_written() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("t.yml"), "key: [unclosed  \n").unwrap();
        let summary = run_quiet(root, &opts(Mode::WriteWithoutBackup));
        assert_eq!(summary.validation_warnings.len(), 1);
        assert_eq!(
            fs::read_to_string(root.join("t.yml")).unwrap(),
            "---\nkey: [unclosed\n"
        );
    }

    #[test]
    fn test_cancel_stops_before_next_file() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        seed(root);
        let cancel = AtomicBool::new(true);
        let summary = run(root, &opts(Mode::WriteWithoutBackup), &cancel, |_| {}).unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.files_processed, 0);
        assert_eq!(
            fs::read_to_string(root.join("roles/web/tasks/main.yml")).unwrap(),
            DIRTY
        );
    }

    #[test]
    fn test_invalid_root_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            validate_root(&missing),
            Err(FixError::RootNotFound(_))
        ));
        let file = dir.path().join("f.yml");
        fs::write(&file, "a: 1\n").unwrap();
        let res = run(&file, &opts(Mode::DryRun), &AtomicBool::new(false), |_| {});
        assert!(matches!(res, Err(FixError::RootNotDirectory(_))));
    }
}
