//! Reading `key : value` resource files.
use anyhow::{Context as _, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::value::{RcRecord, RcValue};
use crate::config::RcSchema;

/// `key : value`, searched anywhere in the trimmed line.
#[allow(clippy::expect_used)]
static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([-a-zA-Z0-9_]+) *: *(.*)").expect("entry pattern is a valid regex")
});

/// Whether `line` is a comment (first non-space character is `#`).
fn is_comment(line: &str) -> bool {
    line.trim_start_matches(' ').starts_with('#')
}

/// Split a line into its key and coerced value, if it holds an entry.
fn parse_entry(line: &str) -> Option<(&str, RcValue)> {
    if is_comment(line) {
        return None;
    }
    let caps = ENTRY_RE.captures(line.trim())?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2).map_or("", |m| m.as_str()).trim();
    Some((key, RcValue::coerce(value)))
}

/// Parse resource-file content into `record`.
///
/// Comment lines and lines without a `key : value` entry are skipped.
pub fn parse_rcfile_into(content: &str, record: &mut RcRecord, schema: &RcSchema) {
    for line in content.lines() {
        if let Some((key, value)) = parse_entry(line) {
            record.merge(key, value, schema.merge_policy(key));
        }
    }
}

/// Parse resource-file content into a fresh record.
///
/// # Examples
///
/// ```
/// use installer_utils::config::RcSchema;
/// use installer_utils::rcfile::{parse_rcfile_str, RcValue};
///
/// let rec = parse_rcfile_str(
///     "# versions\nvers : 1\nvers : 2\nmem : 512\n",
///     &RcSchema::default(),
/// );
/// assert_eq!(rec.get("vers"), Some(&RcValue::Str("1 2".into())));
/// assert_eq!(rec.get("mem"), Some(&RcValue::Int(512)));
/// ```
#[must_use]
pub fn parse_rcfile_str(content: &str, schema: &RcSchema) -> RcRecord {
    let mut record = RcRecord::new();
    parse_rcfile_into(content, &mut record, schema);
    record
}

/// Read a resource file and merge its entries into `record`.
///
/// Repeatable fields already present in `record` are appended to.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_rcfile_into(path: &Path, record: &mut RcRecord, schema: &RcSchema) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading resource file {}", path.display()))?;
    parse_rcfile_into(&content, record, schema);
    Ok(())
}

/// Read a resource file into a fresh record.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_rcfile(path: &Path, schema: &RcSchema) -> Result<RcRecord> {
    let mut record = RcRecord::new();
    read_rcfile_into(path, &mut record, schema)?;
    Ok(record)
}
