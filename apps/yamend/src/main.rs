//! yamend CLI binary entry point.
//! Resolves configuration, runs the fixer and prints results.

use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use yamend::cli::{Cli, Commands, ScanArgs};
use yamend::config::{self, Effective, Overrides};
use yamend::discover::Excludes;
use yamend::error::FixError;
use yamend::models::summary::RunSummary;
use yamend::runner::{self, RunOptions};
use yamend::{output, utils};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Fix {
            scan,
            dry_run,
            diff,
            no_backup,
            backup_suffix,
        } => {
            init_logging(scan.verbose);
            let mut ov = overrides(&scan);
            // --diff previews only
            ov.dry_run = (dry_run || diff).then_some(true);
            ov.backup = no_backup.then_some(false);
            ov.backup_suffix = backup_suffix;
            let eff = config::resolve_effective(ov);
            let summary = execute(&eff, diff);
            if summary.interrupted {
                std::process::exit(1);
            }
        }
        Commands::Check { scan, diff } => {
            init_logging(scan.verbose);
            let mut ov = overrides(&scan);
            ov.dry_run = Some(true);
            let eff = config::resolve_effective(ov);
            let summary = execute(&eff, diff);
            if summary.interrupted || summary.files_changed > 0 {
                std::process::exit(1);
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn overrides(scan: &ScanArgs) -> Overrides {
    Overrides {
        root: scan.path.clone(),
        output: scan.output.clone(),
        max_line_length: scan.max_line_length,
        exclude_dirs: scan.exclude_dirs.clone(),
        exclude_patterns: scan.exclude_patterns.clone(),
        ..Default::default()
    }
}

/// Run the batch and print the summary. Setup errors exit with code 2.
fn execute(eff: &Effective, diff: bool) -> RunSummary {
    match &eff.config_path {
        Some(p) => log::debug!("using config {}", p.display()),
        None => log::debug!("no yamend config found; using defaults"),
    }
    let excludes = match Excludes::new(&eff.exclude_dirs, &eff.exclude_patterns) {
        Ok(ex) => ex,
        Err(e) => fail(&e.to_string()),
    };
    let opts = RunOptions {
        mode: eff.mode,
        backup_suffix: eff.backup_suffix.clone(),
        max_line_length: eff.max_line_length,
        excludes,
        diff,
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log::warn!("cannot install interrupt handler: {e}");
    }

    let json = eff.output == "json";
    let mut diffs: Vec<(String, String)> = Vec::new();
    let result = runner::run(&eff.root, &opts, &cancel, |outcome| {
        let Some(d) = &outcome.diff else {
            return;
        };
        let file = pathdiff::diff_paths(&outcome.path, &eff.root)
            .unwrap_or_else(|| outcome.path.clone())
            .to_string_lossy()
            .to_string();
        if json {
            diffs.push((file, d.clone()));
        } else {
            output::print_diff(&file, d, &eff.output);
        }
    });
    let summary = match result {
        Ok(s) => s,
        Err(e @ FixError::RootNotDirectory(_)) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            eprintln!(
                "{} yamend processes directories containing YAML files, not individual files.",
                utils::note_prefix()
            );
            std::process::exit(2);
        }
        Err(e) => fail(&e.to_string()),
    };
    output::print_summary(&summary, &eff.output, &diffs);
    if summary.interrupted && !json {
        eprintln!("\nOperation cancelled by user");
    }
    summary
}

fn fail(msg: &str) -> ! {
    eprintln!("{} {}", utils::error_prefix(), msg);
    std::process::exit(2);
}
