//! Regex search over file contents and storage of captured fields.
use anyhow::{Context as _, Result};
use regex::{Captures, Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::logging::Log;

/// A `?TOKEN?` placeholder left in a template that was never configured.
#[allow(clippy::expect_used)]
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\?[A-Z_0-9]+\?").expect("placeholder pattern is a valid regex")
});

/// Regex compilation flags for [`re_search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RegexFlags {
    /// Match letters case-insensitively.
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// Whitespace and `#` comments in the pattern are ignored.
    pub ignore_whitespace: bool,
}

impl RegexFlags {
    /// Flags with only multi-line mode enabled.
    #[must_use]
    pub const fn multi_line() -> Self {
        Self {
            case_insensitive: false,
            multi_line: true,
            dot_matches_new_line: false,
            ignore_whitespace: false,
        }
    }

    fn build(self, pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .build()
    }
}

/// An owned regex match: the whole match and its capture groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    text: String,
    groups: Vec<Option<String>>,
}

impl TextMatch {
    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            text: caps
                .get(0)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            groups: caps
                .iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    /// The text of the whole match.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Capture group `index` (1-based, as in the pattern); `None` if the
    /// group does not exist or did not participate.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .and_then(Option::as_deref)
    }

    /// All capture groups in order.
    #[must_use]
    pub fn groups(&self) -> &[Option<String>] {
        &self.groups
    }
}

/// Search `pattern` in the whole content of the file at `path`.
///
/// Returns `Ok(None)` when `path` is not a regular file or nothing matches.
///
/// # Errors
///
/// Returns an error if the pattern is invalid or the file cannot be read.
pub fn re_search(
    path: &Path,
    pattern: &str,
    flags: RegexFlags,
    log: &dyn Log,
) -> Result<Option<TextMatch>> {
    log.debug(&format!(
        "search regular expression {pattern:?} in {}",
        path.display()
    ));
    if !path.is_file() {
        log.debug(&format!("not found: {}", path.display()));
        return Ok(None);
    }
    let re = flags
        .build(pattern)
        .with_context(|| format!("invalid regular expression {pattern:?}"))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(re.captures(&content).map(|caps| TextMatch::from_captures(&caps)))
}

/// Store the capture groups of `found` into `dict`, one per name in `names`.
///
/// Only the first `min(names.len(), groups)` pairs are used. Each value is
/// trimmed. A value containing a `?TOKEN?` placeholder is reported as not
/// configured and leaves `dict` unchanged for that name. A group that did
/// not participate stores an empty string.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use installer_utils::logging::MemoryLog;
/// use installer_utils::text_match::check_and_store;
/// # use installer_utils::text_match::RegexFlags;
/// # let dir = tempfile::tempdir().unwrap();
/// # let path = dir.path().join("cfg");
/// # std::fs::write(&path, "HOST= node1 \nPORT=?PORT?\n").unwrap();
/// # let log = MemoryLog::new();
/// let found = installer_utils::text_match::re_search(
///     &path, r"HOST=(.*)\nPORT=(.*)", RegexFlags::default(), &log,
/// ).unwrap();
///
/// let mut dict = BTreeMap::new();
/// check_and_store(&mut dict, found.as_ref(), &["host", "port"], &log);
/// assert_eq!(dict.get("host").map(String::as_str), Some("node1"));
/// assert!(!dict.contains_key("port"));
/// ```
pub fn check_and_store<S: AsRef<str>>(
    dict: &mut BTreeMap<String, String>,
    found: Option<&TextMatch>,
    names: &[S],
    log: &dyn Log,
) {
    let Some(found) = found else {
        return;
    };
    let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    log.debug(&format!("check_and_store: variables={names:?}"));
    log.debug(&format!("                 values={:?}", found.groups()));
    for (name, group) in names.iter().zip(found.groups()) {
        let value = group.as_deref().unwrap_or_default().trim();
        if PLACEHOLDER_RE.is_match(value) {
            log.info(&format!("{name} is not configured ({value:?})"));
            continue;
        }
        dict.insert((*name).to_string(), value.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{Level, MemoryLog};

    fn write_temp(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn re_search_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let log = MemoryLog::new();
        let found = re_search(&dir.path().join("absent"), "x", RegexFlags::default(), &log);
        assert_eq!(found.unwrap(), None);
        assert!(log.messages(Level::Debug).iter().any(|m| m.starts_with("not found")));
    }

    #[test]
    fn re_search_directory_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let found = re_search(dir.path(), "x", RegexFlags::default(), &MemoryLog::new());
        assert_eq!(found.unwrap(), None);
    }

    #[test]
    fn re_search_returns_groups() {
        let (_dir, path) = write_temp("prefix = /opt/aster\nversion = 11.2\n");
        let found = re_search(
            &path,
            r"^version = ([0-9]+)\.([0-9]+)$",
            RegexFlags::multi_line(),
            &MemoryLog::new(),
        )
        .unwrap()
        .expect("pattern should match");
        assert_eq!(found.as_str(), "version = 11.2");
        assert_eq!(found.group(1), Some("11"));
        assert_eq!(found.group(2), Some("2"));
        assert_eq!(found.group(0), None);
        assert_eq!(found.group(3), None);
    }

    #[test]
    fn re_search_without_multiline_anchors_whole_text() {
        let (_dir, path) = write_temp("a\nversion = 1\n");
        let found = re_search(&path, r"^version", RegexFlags::default(), &MemoryLog::new());
        assert_eq!(found.unwrap(), None);
    }

    #[test]
    fn re_search_case_insensitive() {
        let (_dir, path) = write_temp("HOME=/root\n");
        let flags = RegexFlags {
            case_insensitive: true,
            ..RegexFlags::default()
        };
        let found = re_search(&path, "home=(.*)", flags, &MemoryLog::new()).unwrap();
        assert_eq!(found.and_then(|m| m.group(1).map(String::from)), Some("/root".into()));
    }

    #[test]
    fn re_search_invalid_pattern_is_an_error() {
        let (_dir, path) = write_temp("x");
        assert!(re_search(&path, "(", RegexFlags::default(), &MemoryLog::new()).is_err());
    }

    #[test]
    fn check_and_store_none_is_noop() {
        let mut dict = BTreeMap::new();
        check_and_store(&mut dict, None, &["a"], &MemoryLog::new());
        assert!(dict.is_empty());
    }

    #[test]
    fn check_and_store_limits_to_shorter_side() {
        let (_dir, path) = write_temp("a=1 b=2 c=3");
        let log = MemoryLog::new();
        let found = re_search(&path, r"a=(\d) b=(\d) c=(\d)", RegexFlags::default(), &log).unwrap();

        let mut dict = BTreeMap::new();
        check_and_store(&mut dict, found.as_ref(), &["a", "b"], &log);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict["b"], "2");

        let mut dict = BTreeMap::new();
        check_and_store(&mut dict, found.as_ref(), &["a", "b", "c", "d"], &log);
        assert_eq!(dict.len(), 3);
        assert!(!dict.contains_key("d"));
    }

    #[test]
    fn check_and_store_placeholder_keeps_old_value() {
        let (_dir, path) = write_temp("CC= ?CC_COMPILER? \n");
        let log = MemoryLog::new();
        let found = re_search(&path, r"CC=(.*)", RegexFlags::default(), &log).unwrap();

        let mut dict = BTreeMap::from([("cc".to_string(), "gcc".to_string())]);
        check_and_store(&mut dict, found.as_ref(), &["cc"], &log);
        assert_eq!(dict["cc"], "gcc");
        assert_eq!(log.messages(Level::Info).len(), 1);
        assert!(log.messages(Level::Info)[0].contains("cc is not configured"));
    }

    #[test]
    fn check_and_store_trims_and_overwrites() {
        let (_dir, path) = write_temp("CC=  icc  \n");
        let log = MemoryLog::new();
        let found = re_search(&path, r"CC=(.*)", RegexFlags::default(), &log).unwrap();

        let mut dict = BTreeMap::from([("cc".to_string(), "gcc".to_string())]);
        check_and_store(&mut dict, found.as_ref(), &[String::from("cc")], &log);
        assert_eq!(dict["cc"], "icc");
    }

    #[test]
    fn check_and_store_non_participating_group_is_empty() {
        let (_dir, path) = write_temp("x");
        let log = MemoryLog::new();
        let found = re_search(&path, r"(x)|(y)", RegexFlags::default(), &log).unwrap();

        let mut dict = BTreeMap::new();
        check_and_store(&mut dict, found.as_ref(), &["first", "second"], &log);
        assert_eq!(dict["first"], "x");
        assert_eq!(dict["second"], "");
    }
}
