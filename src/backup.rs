//! Names for backup copies of installed files.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Backup path for `path` using extension `ext`.
///
/// A leading `.` is added to `ext` when missing. Hidden backups are named
/// `.ext-name`, visible ones `name.ext`, both in the directory of `path`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use installer_utils::backup::backup_name;
///
/// assert_eq!(backup_name(Path::new("/a/b.txt"), "bak", true), PathBuf::from("/a/.bak-b.txt"));
/// assert_eq!(backup_name(Path::new("/a/b.txt"), ".orig", false), PathBuf::from("/a/b.txt.orig"));
/// ```
#[must_use]
pub fn backup_name(path: &Path, ext: &str, hidden: bool) -> PathBuf {
    let ext = if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    };
    let base = path.file_name().unwrap_or_default();
    let mut name = OsString::new();
    if hidden {
        name.push(&ext);
        name.push("-");
        name.push(base);
    } else {
        name.push(base);
        name.push(&ext);
    }
    path.parent()
        .map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name))
}
