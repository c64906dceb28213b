//! Unified diff between two files on disk.
use anyhow::{Context as _, Result};
use chrono::{DateTime, Local};
use similar::TextDiff;
use std::fs;
use std::path::Path;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// `--- path\tmtime` header value, mtime in local `ctime` style.
fn header(path: &Path) -> Result<String> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("reading modification time of {}", path.display()))?;
    let stamp = DateTime::<Local>::from(modified).format("%a %b %e %H:%M:%S %Y");
    Ok(format!("{}\t{stamp}", path.display()))
}

/// Unified diff of the contents of `from` and `to`.
///
/// Returns an empty string when both files hold the same text.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn print_diff(from: &Path, to: &Path) -> Result<String> {
    let old = fs::read_to_string(from).with_context(|| format!("reading {}", from.display()))?;
    let new = fs::read_to_string(to).with_context(|| format!("reading {}", to.display()))?;
    let (old_header, new_header) = (header(from)?, header(to)?);
    Ok(TextDiff::from_lines(&old, &new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&old_header, &new_header)
        .to_string())
}
