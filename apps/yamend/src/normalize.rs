//! Line-oriented YAML normalizer.
//!
//! The pipeline applies a fixed sequence of independent passes, each taking
//! the lines produced by the previous one and reporting how many lines it
//! altered:
//! 1. trailing spaces (also drops the `\r` of CRLF endings)
//! 2. document start marker
//! 3. comment spacing
//! 4. indentation (tabs and odd widths)
//! 5. colon/hyphen spacing
//! 6. line length (advisory only, never mutates)
//! 7. final newline, applied once to the reassembled content
//!
//! Design notes:
//! - Passes are plain text heuristics, not a YAML tokenizer. A line holding
//!   two or more quote characters is assumed to carry a string literal and
//!   its `#` is left alone; a `#` inside an unquoted scalar (e.g. a URL
//!   fragment) is still treated as a comment. Lines with anchors, aliases
//!   or merge keys are never touched by the spacing pass.
//! - A second run over corrected output changes nothing.

use crate::models::{ChangeTally, FixKind, LongLine};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 120;
/// Lines are only flagged once they exceed the limit by this many columns.
const LONG_LINE_MARGIN: usize = 20;
const TAB_WIDTH: usize = 2;
/// Number of lines, starting at the first content line, searched for `---`.
const DOC_START_WINDOW: usize = 3;
const DOC_START: &str = "---";

static KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\w+:").expect("valid key regex"));
static KEY_MISSING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*\w+):(\S)").expect("valid key regex"));
static KEY_WIDE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*\w+):[ \t]{2,}").expect("valid key regex"));
static ITEM_MISSING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-([^\s-])").expect("valid item regex"));
static ITEM_WIDE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-[ \t]{2,}").expect("valid item regex"));

/// A line pass: lines in, lines out plus the number of lines it altered.
type LineStep = fn(Vec<String>) -> (Vec<String>, usize);

/// Mutating line passes in pipeline order.
const LINE_STEPS: [(FixKind, LineStep); 5] = [
    (FixKind::TrailingSpaces, fix_trailing_spaces),
    (FixKind::DocumentStart, fix_document_start),
    (FixKind::CommentSpacing, fix_comment_spacing),
    (FixKind::Indentation, fix_indentation),
    (FixKind::YamlStructure, fix_yaml_structure),
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Output of one normalization run.
pub struct Normalized {
    pub content: String,
    pub tally: ChangeTally,
    pub long_lines: Vec<LongLine>,
}

impl Normalized {
    pub fn changed(&self) -> bool {
        !self.tally.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
/// Normalizer settings.
pub struct Normalizer {
    pub max_line_length: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl Normalizer {
    pub fn new(max_line_length: usize) -> Self {
        Normalizer { max_line_length }
    }

    /// Run the full pipeline over `content`.
    ///
    /// Empty or whitespace-only input is returned unchanged with an
    /// all-zero tally.
    pub fn normalize(&self, content: &str) -> Normalized {
        let mut tally = ChangeTally::default();
        if content.trim().is_empty() {
            return Normalized {
                content: content.to_string(),
                tally,
                long_lines: Vec::new(),
            };
        }

        let mut lines = split_lines(content);
        for (kind, step) in LINE_STEPS {
            let (next, changes) = step(lines);
            tally.add(kind, changes);
            lines = next;
        }
        let long_lines = check_line_length(&lines, self.max_line_length);

        let (content, eof_changes) = fix_newline_at_eof(lines.join("\n"));
        tally.add(FixKind::NewlineEof, eof_changes);

        Normalized {
            content,
            tally,
            long_lines,
        }
    }
}

/// Normalize with default settings.
pub fn normalize(content: &str) -> Normalized {
    Normalizer::default().normalize(content)
}

/// Split on `\n` only, so that joining with `\n` restores the input.
pub fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

/// Strip trailing spaces, tabs and carriage returns from every line.
pub fn fix_trailing_spaces(lines: Vec<String>) -> (Vec<String>, usize) {
    let mut changes = 0;
    let fixed = lines
        .into_iter()
        .map(|line| {
            let trimmed = line.trim_end_matches([' ', '\t', '\r']);
            if trimmed.len() == line.len() {
                line
            } else {
                changes += 1;
                trimmed.to_string()
            }
        })
        .collect();
    (fixed, changes)
}

/// Insert `---` before the first line that is not part of the header.
///
/// The header is the leading run of blank lines and well-formed comments
/// (see `is_header_comment`). Nothing is inserted when the file has no
/// content lines, or when a document start marker appears within
/// `DOC_START_WINDOW` lines of the first content line.
pub fn fix_document_start(mut lines: Vec<String>) -> (Vec<String>, usize) {
    let Some(first_content) = lines.iter().position(|l| {
        let t = l.trim();
        !t.is_empty() && !t.starts_with('#')
    }) else {
        return (lines, 0);
    };
    let window_end = (first_content + DOC_START_WINDOW).min(lines.len());
    if lines[first_content..window_end]
        .iter()
        .any(|l| is_document_start(l))
    {
        return (lines, 0);
    }
    let insert_at = lines
        .iter()
        .position(|l| {
            let t = l.trim();
            !t.is_empty() && !is_header_comment(t)
        })
        .unwrap_or(first_content);
    lines.insert(insert_at, DOC_START.to_string());
    (lines, 1)
}

fn is_document_start(line: &str) -> bool {
    let t = line.trim();
    t == DOC_START || t.starts_with("--- ")
}

/// A comment whose marker is already separated from its text: `#` at end of
/// line or followed by a non-alphanumeric character (`# text`, `##`, `#!`).
fn is_header_comment(trimmed: &str) -> bool {
    match trimmed.strip_prefix('#') {
        Some(rest) => rest.chars().next().map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Normalize spacing around the first `#` of each line.
///
/// Shebang lines and lines that look like they hold a quoted string are
/// skipped.
pub fn fix_comment_spacing(lines: Vec<String>) -> (Vec<String>, usize) {
    let mut changes = 0;
    let fixed = lines
        .into_iter()
        .map(|line| match fix_comment_line(&line) {
            Some(f) if f != line => {
                changes += 1;
                f
            }
            _ => line,
        })
        .collect();
    (fixed, changes)
}

fn fix_comment_line(line: &str) -> Option<String> {
    let hash = line.find('#')?;
    if line.trim_start().starts_with("#!") || looks_quoted(line) {
        return None;
    }
    let before = &line[..hash];
    let after = &line[hash + 1..];

    let mut out = String::with_capacity(line.len() + 2);
    if before.trim().is_empty() {
        out.push_str(before);
    } else {
        out.push_str(before.trim_end());
        out.push(' ');
    }
    out.push('#');
    let text = after.trim_start();
    if text.is_empty() {
        out.push_str(after);
    } else {
        out.push(' ');
        out.push_str(text);
    }
    Some(out)
}

fn looks_quoted(line: &str) -> bool {
    line.chars().filter(|c| *c == '"' || *c == '\'').count() >= 2
}

/// Expand tabs to 2-column stops and round odd indentation down.
///
/// Blank and comment lines are left alone.
pub fn fix_indentation(lines: Vec<String>) -> (Vec<String>, usize) {
    let mut changes = 0;
    let fixed = lines
        .into_iter()
        .map(|line| {
            let t = line.trim();
            if t.is_empty() || t.starts_with('#') {
                return line;
            }
            let mut fixed = if line.contains('\t') {
                expand_tabs(&line, TAB_WIDTH)
            } else {
                line.clone()
            };
            let body = fixed.trim_start_matches(' ');
            let indent = fixed.len() - body.len();
            if indent % 2 != 0 {
                fixed = format!("{}{}", " ".repeat(indent - 1), body);
            }
            if fixed != line {
                changes += 1;
            }
            fixed
        })
        .collect();
    (fixed, changes)
}

/// Replace each tab with spaces up to the next multiple of `width`.
fn expand_tabs(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len() + width);
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = width - (col % width);
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Exactly one space after `key:` and after a sequence item's `-`.
///
/// Comment lines and lines carrying `&`, `*` or `<<:` are skipped so that
/// anchors, aliases and merge keys stay intact.
pub fn fix_yaml_structure(lines: Vec<String>) -> (Vec<String>, usize) {
    let mut changes = 0;
    let fixed = lines
        .into_iter()
        .map(|line| {
            let t = line.trim();
            if t.starts_with('#') || t.contains('&') || t.contains('*') || t.contains("<<:") {
                return line;
            }
            let mut fixed = line.clone();
            if KEY_LINE.is_match(&fixed) {
                fixed = KEY_MISSING_SPACE
                    .replace(&fixed, "${1}: ${2}")
                    .into_owned();
                fixed = KEY_WIDE_SPACE.replace(&fixed, "${1}: ").into_owned();
            }
            if t.starts_with('-') && !t.starts_with(DOC_START) {
                fixed = ITEM_MISSING_SPACE
                    .replace(&fixed, "${1}- ${2}")
                    .into_owned();
                fixed = ITEM_WIDE_SPACE.replace(&fixed, "${1}- ").into_owned();
            }
            if fixed != line {
                changes += 1;
            }
            fixed
        })
        .collect();
    (fixed, changes)
}

/// Flag lines wider than `max_length + LONG_LINE_MARGIN` characters.
pub fn check_line_length(lines: &[String], max_length: usize) -> Vec<LongLine> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, l)| {
            let width = l.chars().count();
            (width > max_length + LONG_LINE_MARGIN).then_some(LongLine {
                line: i + 1,
                width,
            })
        })
        .collect()
}

/// Strip all trailing whitespace and end the content with exactly one `\n`.
pub fn fix_newline_at_eof(content: String) -> (String, usize) {
    if content.is_empty() {
        return (content, 0);
    }
    let fixed = format!("{}\n", content.trim_end());
    if fixed == content {
        (content, 0)
    } else {
        (fixed, 1)
    }
}

/// Best-effort syntax check; every document in the stream must parse.
pub fn validate_yaml(content: &str) -> Result<(), serde_yaml::Error> {
    for document in serde_yaml::Deserializer::from_str(content) {
        serde_yaml::Value::deserialize(document)?;
    }
    Ok(())
}
