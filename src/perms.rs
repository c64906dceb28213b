//! Making installed scripts readable and executable by everyone.
use std::path::Path;

use crate::logging::Log;

/// Bits added to every script: read and execute for user, group and others.
#[cfg(unix)]
const SCRIPT_BITS: u32 = 0o555;

/// Whether the current user may write to `path` (`access(2)` with `W_OK`).
#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};

    access(path, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| !m.permissions().readonly())
}

/// Add `r-x` for everyone to each of `paths`.
///
/// Paths the current user cannot write to are skipped with a warning, as
/// are paths whose permissions cannot be changed. Files already carrying
/// the bits are left alone.
pub fn chmod_scripts<P: AsRef<Path>>(paths: &[P], log: &dyn Log) {
    for path in paths {
        let path = path.as_ref();
        if !is_writable(path) {
            log.warn(&format!(
                "no sufficient permission to change '{}', skipped",
                path.display()
            ));
            continue;
        }
        chmod_one(path, log);
    }
}

#[cfg(unix)]
fn chmod_one(path: &Path, log: &dyn Log) {
    use std::os::unix::fs::PermissionsExt;

    let current = match std::fs::metadata(path) {
        Ok(meta) => meta.permissions().mode() & 0o7777,
        Err(e) => {
            log.warn(&format!("cannot read mode of {}: {e}", path.display()));
            return;
        }
    };
    let mode = (current | SCRIPT_BITS) & 0o7777;
    if mode == current {
        log.debug(&format!("mode of {} already {mode:o}", path.display()));
        return;
    }
    log.info(&format!("changing mode of {} to {mode:o}", path.display()));
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)) {
        log.error(&format!("set permissions: {}: {e}", path.display()));
    }
}

#[cfg(not(unix))]
fn chmod_one(path: &Path, log: &dyn Log) {
    log.warn(&format!(
        "chmod not supported on this platform, {} unchanged",
        path.display()
    ));
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{Level, MemoryLog};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o7777
    }

    fn script(dir: &Path, name: &str, mode: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn adds_read_and_execute_bits() {
        let dir = tempfile::tempdir().unwrap();
        let a = script(dir.path(), "a", 0o600);
        let b = script(dir.path(), "b", 0o4640);

        let log = MemoryLog::new();
        chmod_scripts(&[&a, &b], &log);

        assert_eq!(mode(&a), 0o755);
        assert_eq!(mode(&b), 0o4755);
        assert_eq!(log.messages(Level::Info).len(), 2);
    }

    #[test]
    fn correct_mode_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let a = script(dir.path(), "a", 0o755);

        let log = MemoryLog::new();
        chmod_scripts(&[&a], &log);

        assert_eq!(mode(&a), 0o755);
        assert!(log.messages(Level::Info).is_empty());
    }

    #[test]
    fn missing_path_is_skipped_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let fixed = script(dir.path(), "ok", 0o700);

        let log = MemoryLog::new();
        chmod_scripts(&[missing.as_path(), fixed.as_path()], &log);

        let warnings = log.messages(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("no sufficient permission"));
        assert_eq!(mode(&fixed), 0o755);
    }

    #[test]
    fn writable_directory_is_changed() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o700)).unwrap();

        let log = MemoryLog::new();
        chmod_scripts(&[&bin], &log);

        assert!(log.messages(Level::Warn).is_empty());
        assert_eq!(mode(&bin), 0o755);
    }
}
