//! Output rendering for run summaries and diffs.
//!
//! Supports `human` (default) and `json` outputs. The JSON form carries the
//! same totals, per-kind file lists and advisories as the human summary.

use crate::models::summary::RunSummary;
use crate::models::FixKind;
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use similar::TextDiff;

/// Number of example files listed per change kind.
const EXAMPLES_PER_KIND: usize = 5;
const RULE: &str = "============================================================";

/// Unified diff between the original and corrected content.
pub fn unified_diff(old: &str, new: &str, file: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(2)
        .header(&format!("a/{file}"), &format!("b/{file}"))
        .to_string()
}

/// Print one file's diff in human mode.
pub fn print_diff(file: &str, diff: &str, output: &str) {
    if use_colors(output) {
        println!("{} {}", "==>".cyan().bold(), file.bold());
        for line in diff.lines() {
            if line.starts_with('+') && !line.starts_with("+++") {
                println!("{}", line.green());
            } else if line.starts_with('-') && !line.starts_with("---") {
                println!("{}", line.red());
            } else {
                println!("{line}");
            }
        }
    } else {
        println!("==> {file}\n{diff}");
    }
}

/// Print the run summary in the requested format. `diffs` holds
/// `(file, diff)` pairs to embed in JSON output.
pub fn print_summary(summary: &RunSummary, output: &str, diffs: &[(String, String)]) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_summary_json(summary, diffs)) {
            Ok(s) => println!("{s}"),
            Err(e) => log::error!("cannot render summary: {e}"),
        },
        _ => print!("{}", render_human(summary, use_colors(output))),
    }
}

/// Human summary text (pure, for testing).
pub fn render_human(summary: &RunSummary, color: bool) -> String {
    let bold = |s: &str| {
        if color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    };
    let mut out = String::new();
    out.push_str(&format!("\n{RULE}\n"));
    out.push_str(&format!("{}\n", bold("YAML LINT FIX SUMMARY")));
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!("Files processed: {}\n", summary.files_processed));
    out.push_str(&format!("Files changed: {}\n", summary.files_changed));
    out.push_str(&format!("Mode: {}\n", summary.mode.label()));
    if summary.mode.writes() {
        out.push_str(&format!("Files written: {}\n", summary.files_written));
    }
    if summary.interrupted {
        let msg = "Run interrupted; remaining files were not processed.";
        if color {
            out.push_str(&format!("{}\n", msg.yellow().bold()));
        } else {
            out.push_str(&format!("{msg}\n"));
        }
    }

    if summary.changes.is_empty() {
        out.push_str("\nNo changes were needed!\n");
    } else {
        out.push_str("\nChanges by type:\n");
        out.push_str(&format!("{}\n", "-".repeat(40)));
        for kind in FixKind::ALL {
            let Some(files) = summary.changes.get(&kind) else {
                continue;
            };
            out.push_str(&format!(
                "\n{}: {} changes in {} files\n",
                bold(kind.description()),
                summary.kind_total(kind),
                files.len()
            ));
            for (path, count) in files.iter().take(EXAMPLES_PER_KIND) {
                out.push_str(&format!(
                    "  - {}: {} changes\n",
                    summary.display_path(path),
                    count
                ));
            }
            if files.len() > EXAMPLES_PER_KIND {
                out.push_str(&format!(
                    "  ... and {} more files\n",
                    files.len() - EXAMPLES_PER_KIND
                ));
            }
        }
    }

    if !summary.long_lines.is_empty() {
        out.push_str(&format!(
            "\nLong lines flagged (not changed): {}\n",
            summary.long_lines.len()
        ));
        for (path, ll) in summary.long_lines.iter().take(EXAMPLES_PER_KIND) {
            out.push_str(&format!(
                "  - {}:{} ({} columns)\n",
                summary.display_path(path),
                ll.line,
                ll.width
            ));
        }
    }
    if !summary.validation_warnings.is_empty() {
        out.push_str(&format!(
            "\nFiles written despite failing YAML validation: {}\n",
            summary.validation_warnings.len()
        ));
        for path in summary.validation_warnings.iter().take(EXAMPLES_PER_KIND) {
            out.push_str(&format!("  - {}\n", summary.display_path(path)));
        }
    }
    if !summary.errors.is_empty() {
        let head = format!("\nFiles skipped due to errors: {}", summary.errors.len());
        if color {
            out.push_str(&format!("{}\n", head.red()));
        } else {
            out.push_str(&format!("{head}\n"));
        }
        for (path, err) in &summary.errors {
            out.push_str(&format!("  - {}: {}\n", summary.display_path(path), err));
        }
    }

    out.push_str(&format!("\n{RULE}\n"));
    if let Some(suffix) = summary.backup_suffix.as_deref() {
        if summary.files_changed > 0 {
            out.push_str(&format!("Original files backed up with suffix: {suffix}\n"));
            out.push_str(&format!(
                "To remove backups: find . -name '*{suffix}' -delete\n"
            ));
        }
    }
    out
}

/// Compose the summary JSON object (pure) for testing/snapshot purposes.
pub fn compose_summary_json(summary: &RunSummary, diffs: &[(String, String)]) -> JsonVal {
    let mut changes = serde_json::Map::new();
    for kind in FixKind::ALL {
        let files = summary.changes.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
        let items: Vec<_> = files
            .iter()
            .map(|(p, n)| json!({"file": summary.display_path(p), "count": n}))
            .collect();
        changes.insert(
            kind.key().to_string(),
            json!({"total": summary.kind_total(kind), "files": items}),
        );
    }
    let long_lines: Vec<_> = summary
        .long_lines
        .iter()
        .map(|(p, ll)| json!({"file": summary.display_path(p), "line": ll.line, "width": ll.width}))
        .collect();
    let warnings: Vec<_> = summary
        .validation_warnings
        .iter()
        .map(|p| summary.display_path(p))
        .collect();
    let errors: Vec<_> = summary
        .errors
        .iter()
        .map(|(p, e)| json!({"file": summary.display_path(p), "error": e}))
        .collect();
    let backups: Vec<_> = summary
        .backups
        .iter()
        .map(|p| summary.display_path(p))
        .collect();
    let diffs: Vec<_> = diffs
        .iter()
        .map(|(f, d)| json!({"file": f, "diff": d}))
        .collect();
    json!({
        "mode": summary.mode,
        "files_processed": summary.files_processed,
        "files_changed": summary.files_changed,
        "files_written": summary.files_written,
        "changes": changes,
        "long_lines": long_lines,
        "validation_warnings": warnings,
        "errors": errors,
        "interrupted": summary.interrupted,
        "backup_suffix": summary.backup_suffix,
        "backups": backups,
        "diffs": diffs,
    })
}
