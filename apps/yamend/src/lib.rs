//! yamend core library.
//!
//! This crate exposes programmatic APIs for rewriting YAML files so that they
//! satisfy common yamllint style rules.
//!
//! High-level modules:
//! - `normalize`: The line-oriented fix pipeline for one file's content.
//! - `discover`: Recursive YAML file discovery with exclusions.
//! - `backup`: Sibling backup copies before overwriting.
//! - `runner`: Batch processing with per-file fault isolation.
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Fix kinds, tallies, per-file outcomes and run summaries.
//! - `output`: Human/JSON printers and diffs.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `error`: Error types.
//! - `utils`: Supporting helpers.
pub mod backup;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod models;
pub mod normalize;
pub mod output;
pub mod runner;
pub mod utils;

pub use normalize::{normalize, Normalized, Normalizer};
