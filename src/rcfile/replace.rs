//! Rewriting field values in `key : value` resource files.
//!
//! The whole file is read, every requested field is rewritten in memory, and
//! the result is written back once. Lines that do not belong to a requested
//! field are copied byte for byte, terminators included.
use anyhow::{Context as _, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::{FieldRule, RcSchema, RewriteLayout};
use crate::error::RcFileError;
use crate::logging::Log;

/// Characters a field name may contain (same as the reader's key pattern).
#[allow(clippy::expect_used)]
static FIELD_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-a-zA-Z0-9_]+$").expect("field name pattern is a valid regex")
});

/// What happened to one requested field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// Live occurrences were rewritten; `lines` is the number of
    /// `field : value` lines now in their place.
    Applied {
        /// Number of value lines written.
        lines: usize,
    },
    /// Only a commented-out occurrence existed; it was replaced by live lines.
    Uncommented {
        /// Number of value lines written.
        lines: usize,
    },
    /// The field does not occur in the file, live or commented.
    Skipped,
    /// The field could not be processed; the rest of the rewrite went on.
    Failed(RcFileError),
}

/// Outcome of rewriting one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReport {
    /// Field name as requested.
    pub field: String,
    /// What happened to it.
    pub outcome: FieldOutcome,
}

/// A line split into its body and its terminator (`"\r\n"`, `"\n"` or `""`).
struct Line<'a> {
    body: &'a str,
    term: &'a str,
}

fn split_lines(content: &str) -> Vec<Line<'_>> {
    content
        .split_inclusive('\n')
        .map(|raw| {
            if let Some(body) = raw.strip_suffix("\r\n") {
                Line { body, term: "\r\n" }
            } else if let Some(body) = raw.strip_suffix('\n') {
                Line { body, term: "\n" }
            } else {
                Line { body: raw, term: "" }
            }
        })
        .collect()
}

/// Per-line decision while rewriting a field.
enum Edit {
    Keep,
    Replace(String),
    Drop,
}

/// Patterns for the live and commented-out forms of a field.
struct FieldPatterns {
    live: Regex,
    commented: Regex,
}

impl FieldPatterns {
    fn new(field: &str) -> Result<Self, RcFileError> {
        if !FIELD_NAME_RE.is_match(field) {
            return Err(RcFileError::InvalidFieldName(field.to_string()));
        }
        let escaped = regex::escape(field);
        let build = |pattern: String| {
            Regex::new(&pattern).map_err(|source| RcFileError::Pattern {
                field: field.to_string(),
                source,
            })
        };
        Ok(Self {
            live: build(format!("^{escaped} *: *(.*)$"))?,
            commented: build(format!("^#{escaped} *: *(.*)$"))?,
        })
    }
}

/// Lines emitted for one field value, before joining.
fn value_lines(field: &str, value: &str, layout: &RewriteLayout) -> Vec<String> {
    match layout {
        RewriteLayout::Single => vec![format!("{field} : {value}")],
        RewriteLayout::PerToken | RewriteLayout::Anchored { .. } => value
            .split_whitespace()
            .map(|token| format!("{field} : {token}"))
            .collect(),
    }
}

/// Join `lines` with `eol` and finish with the original terminator, or drop
/// the line when there is nothing to write.
fn emit(lines: &[String], eol: &str, term: &str) -> Edit {
    if lines.is_empty() {
        Edit::Drop
    } else {
        Edit::Replace(format!("{}{term}", lines.join(eol)))
    }
}

/// Rewrite the first matching line with `lines` and drop the other matches.
fn first_then_drop(
    edits: &mut [Edit],
    matches: &[usize],
    lines: &[String],
    eol: &str,
    src: &[Line<'_>],
) {
    for (n, &i) in matches.iter().enumerate() {
        if let (Some(edit), Some(line)) = (edits.get_mut(i), src.get(i)) {
            *edit = if n == 0 {
                emit(lines, eol, line.term)
            } else {
                Edit::Drop
            };
        }
    }
}

/// Compute the edits for one field. Returns `None` when the field does not
/// occur at all.
fn plan_field(
    src: &[Line<'_>],
    patterns: &FieldPatterns,
    rule: &FieldRule,
    lines: &[String],
    eol: &str,
) -> Option<(Vec<Edit>, FieldOutcome)> {
    let mut edits: Vec<Edit> = src.iter().map(|_| Edit::Keep).collect();
    let find = |re: &Regex| -> Vec<usize> {
        src.iter()
            .enumerate()
            .filter(|(_, l)| re.is_match(l.body))
            .map(|(i, _)| i)
            .collect()
    };
    let live = find(&patterns.live);

    if let RewriteLayout::Anchored { sentinel } = &rule.layout {
        let anchors: Vec<usize> = src
            .iter()
            .enumerate()
            .filter(|(_, l)| l.body == sentinel.as_str())
            .map(|(i, _)| i)
            .collect();
        if !anchors.is_empty() {
            for &i in &live {
                if let Some(edit) = edits.get_mut(i) {
                    *edit = Edit::Drop;
                }
            }
            let mut block = vec![sentinel.clone()];
            block.extend_from_slice(lines);
            for &i in &anchors {
                if let (Some(edit), Some(line)) = (edits.get_mut(i), src.get(i)) {
                    *edit = emit(&block, eol, line.term);
                }
            }
            return Some((edits, FieldOutcome::Applied { lines: lines.len() }));
        }
    }

    // Anchored fields are only ever located through their sentinel or the
    // commented form; stray live lines without a sentinel are left alone.
    let anchored = matches!(rule.layout, RewriteLayout::Anchored { .. });
    if !live.is_empty() && !anchored {
        if rule.layout == RewriteLayout::Single {
            for &i in &live {
                if let (Some(edit), Some(line)) = (edits.get_mut(i), src.get(i)) {
                    *edit = emit(lines, eol, line.term);
                }
            }
            return Some((edits, FieldOutcome::Applied { lines: live.len() }));
        }
        first_then_drop(&mut edits, &live, lines, eol, src);
        return Some((edits, FieldOutcome::Applied { lines: lines.len() }));
    }

    let commented = find(&patterns.commented);
    let first = *commented.first()?;
    match &rule.layout {
        RewriteLayout::Single => {
            for &i in &commented {
                if let (Some(edit), Some(line)) = (edits.get_mut(i), src.get(i)) {
                    *edit = emit(lines, eol, line.term);
                }
            }
            Some((edits, FieldOutcome::Uncommented { lines: commented.len() }))
        }
        RewriteLayout::PerToken => {
            first_then_drop(&mut edits, &[first], lines, eol, src);
            Some((edits, FieldOutcome::Uncommented { lines: lines.len() }))
        }
        RewriteLayout::Anchored { sentinel } => {
            for &i in &live {
                if let Some(edit) = edits.get_mut(i) {
                    *edit = Edit::Drop;
                }
            }
            let mut block = vec![sentinel.clone()];
            block.extend_from_slice(lines);
            first_then_drop(&mut edits, &[first], &block, eol, src);
            Some((edits, FieldOutcome::Uncommented { lines: lines.len() }))
        }
    }
}

fn apply_edits(src: &[Line<'_>], edits: Vec<Edit>) -> String {
    let mut out = String::new();
    for (line, edit) in src.iter().zip(edits) {
        match edit {
            Edit::Keep => {
                out.push_str(line.body);
                out.push_str(line.term);
            }
            Edit::Replace(text) => out.push_str(&text),
            Edit::Drop => {}
        }
    }
    out
}

/// Rewrite one field in `content`.
fn replace_field(
    content: &str,
    field: &str,
    value: &str,
    schema: &RcSchema,
    log: &dyn Log,
) -> (Option<String>, FieldOutcome) {
    let patterns = match FieldPatterns::new(field) {
        Ok(p) => p,
        Err(e) => {
            log.debug(&format!("skipping field: {e}"));
            return (None, FieldOutcome::Failed(e));
        }
    };
    let rule = schema.rule(field);
    let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let src = split_lines(content);
    let lines = value_lines(field, value, &rule.layout);

    match plan_field(&src, &patterns, &rule, &lines, eol) {
        Some((edits, outcome)) => {
            if matches!(outcome, FieldOutcome::Uncommented { .. }) {
                log.warn(&format!(
                    "field {field} was commented out, now set to {value}"
                ));
            } else {
                log.debug(&format!("set {field} : {value}"));
            }
            (Some(apply_edits(&src, edits)), outcome)
        }
        None => {
            log.debug(&format!("field {field} not found, skipped"));
            (None, FieldOutcome::Skipped)
        }
    }
}

/// Rewrite the fields in `values` within `content`, returning the new content
/// and one report per requested field (in key order).
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use installer_utils::config::RcSchema;
/// use installer_utils::logging::MemoryLog;
/// use installer_utils::rcfile::{replace_in_str, FieldOutcome};
///
/// let values = BTreeMap::from([("mem".to_string(), "1024")]);
/// let (out, reports) =
///     replace_in_str("mem : 512\n", &values, &RcSchema::default(), &MemoryLog::new());
/// assert_eq!(out, "mem : 1024\n");
/// assert_eq!(reports[0].outcome, FieldOutcome::Applied { lines: 1 });
/// ```
pub fn replace_in_str<V: Display>(
    content: &str,
    values: &BTreeMap<String, V>,
    schema: &RcSchema,
    log: &dyn Log,
) -> (String, Vec<FieldReport>) {
    let mut current = content.to_string();
    let mut reports = Vec::with_capacity(values.len());
    for (field, value) in values {
        let (rewritten, outcome) = replace_field(&current, field, &value.to_string(), schema, log);
        if let Some(text) = rewritten {
            current = text;
        }
        reports.push(FieldReport {
            field: field.clone(),
            outcome,
        });
    }
    (current, reports)
}

/// Rewrite the fields in `values` in the resource file at `path`.
///
/// Fields not in `values` are untouched. Per-field problems are reported,
/// not raised; the file is rewritten once at the end.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn replace_rcfile<V: Display>(
    path: &Path,
    values: &BTreeMap<String, V>,
    schema: &RcSchema,
    log: &dyn Log,
) -> Result<Vec<FieldReport>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading resource file {}", path.display()))?;
    let (rewritten, reports) = replace_in_str(&content, values, schema, log);
    std::fs::write(path, rewritten)
        .with_context(|| format!("writing resource file {}", path.display()))?;
    Ok(reports)
}
