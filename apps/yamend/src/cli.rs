//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "yamend",
    version,
    about = "Fix common yamllint issues in place",
    long_about = "yamend: rewrite YAML files to satisfy common yamllint style rules: trailing spaces, final newline, document start, comment spacing, indentation, and colon/hyphen spacing.\n\nConfiguration precedence: CLI > yamend.toml > defaults.",
    after_help = "Examples:\n  yamend fix                         # Process current directory\n  yamend fix /path/to/collection     # Process specific directory\n  yamend fix --dry-run --diff        # Show what would change without modifying files\n  yamend fix --no-backup             # Don't create backup files\n  yamend check --output json         # CI gate, non-zero exit when fixes are pending",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current yamend version.")]
    Version,
    /// Apply fixes to YAML files
    #[command(
        about = "Apply fixes",
        long_about = "Scan a directory for .yml/.yaml files and rewrite them in place. Originals are backed up unless --no-backup is set. --dry-run and --diff disable writes.",
        after_help = "Examples:\n  yamend fix --dry-run\n  yamend fix roles/ --backup-suffix .orig\n  yamend fix --diff --exclude-dir vendor"
    )]
    Fix {
        #[command(flatten)]
        scan: ScanArgs,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show what would be changed without modifying files")]
        dry_run: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show unified diffs for changed files (implies --dry-run)")]
        diff: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Don't create backup files")]
        no_backup: bool,
        #[arg(long, help = "Suffix for backup files (default: .backup)")]
        backup_suffix: Option<String>,
    },
    /// Report pending fixes without writing
    #[command(
        about = "Check for pending fixes",
        long_about = "Run every fix in preview mode and exit non-zero if any file would change.",
        after_help = "Examples:\n  yamend check\n  yamend check --diff --output json"
    )]
    Check {
        #[command(flatten)]
        scan: ScanArgs,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show unified diffs for changed files")]
        diff: bool,
    },
}

#[derive(Args)]
/// Options shared by `fix` and `check`.
pub struct ScanArgs {
    #[arg(help = "Path to collection root (default: current directory)")]
    pub path: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, help = "Line length advisory threshold (default: 120)")]
    pub max_line_length: Option<usize>,
    #[arg(long = "exclude-dir", value_name = "DIR", help = "Additional directory name or relative path to skip (repeatable)")]
    pub exclude_dirs: Vec<String>,
    #[arg(long = "exclude", value_name = "GLOB", help = "Additional file glob to skip (repeatable)")]
    pub exclude_patterns: Vec<String>,
    #[arg(long, short = 'v', action = clap::ArgAction::SetTrue, help = "Enable verbose logging")]
    pub verbose: bool,
}
