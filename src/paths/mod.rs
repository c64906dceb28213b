//! Moving and removing directory trees during (un)installation.
//!
//! Every operation logs through an injected [`Log`] and honours a dry-run
//! mode in which the file system is left untouched.
pub mod helpers;

use anyhow::{Context as _, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use helpers::copy_tree;

use crate::logging::Log;

/// Options for [`move_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MoveOptions {
    /// Recreate symlinks instead of copying their targets when a tree has
    /// to be copied.
    pub preserve_symlinks: bool,
    /// Log what would happen without touching the file system.
    pub dry_run: bool,
    /// Source and destination share a device, so directories can be
    /// renamed instead of copied.
    pub same_device: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            preserve_symlinks: false,
            dry_run: false,
            same_device: true,
        }
    }
}

/// Options for [`remove_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Log what would happen without touching the file system.
    pub dry_run: bool,
    /// Also remove the ancestors of the removed directory while they are
    /// empty.
    pub empty_dirs: bool,
}

/// Create the parent directories of every `entries` path below `base`.
///
/// # Errors
///
/// Returns an error if a directory cannot be created.
pub fn create_tree<P: AsRef<Path>>(
    base: &Path,
    entries: &[P],
    dry_run: bool,
    log: &dyn Log,
) -> Result<()> {
    let parents: BTreeSet<PathBuf> = entries
        .iter()
        .filter_map(|e| base.join(e.as_ref()).parent().map(Path::to_path_buf))
        .collect();
    for dir in parents.iter().filter(|d| !d.is_dir()) {
        if dry_run {
            log.dry_run(&format!("would create directory {}", dir.display()));
            continue;
        }
        log.debug(&format!("creating {}", dir.display()));
        fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    }
    Ok(())
}

/// Move every entry of `entries` (relative paths) from `src` to `dst`.
///
/// Missing sources are logged and skipped. Symlinks are recreated at the
/// destination. Directories are renamed when `same_device` is set and copied
/// then removed otherwise. Files are renamed, or copied and removed when a
/// rename is impossible.
///
/// # Errors
///
/// Returns an error if a destination directory cannot be created or an
/// entry cannot be moved.
pub fn move_tree<P: AsRef<Path>>(
    src: &Path,
    entries: &[P],
    dst: &Path,
    options: MoveOptions,
    log: &dyn Log,
) -> Result<()> {
    create_tree(dst, entries, options.dry_run, log)?;
    for entry in entries {
        let rel = entry.as_ref();
        let from = src.join(rel);
        let to = dst.join(rel);
        log.debug(&format!("move {} to {}", from.display(), to.display()));

        let Ok(meta) = fs::symlink_metadata(&from) else {
            log.info(&format!("not found: {}", from.display()));
            continue;
        };
        if options.dry_run {
            log.dry_run(&format!("would move {} to {}", from.display(), to.display()));
            continue;
        }

        if meta.file_type().is_symlink() {
            let target = fs::read_link(&from)
                .with_context(|| format!("reading link {}", from.display()))?;
            log.info(&format!("linking {} -> {}", to.display(), target.display()));
            helpers::make_symlink(&target, &to)?;
            fs::remove_file(&from).with_context(|| format!("removing {}", from.display()))?;
        } else if meta.is_dir() {
            if options.same_device {
                let moved = helpers::move_dir(&from, &to, log)?;
                log.info(&format!("moved {} to {}", from.display(), moved.display()));
            } else {
                log.info(&format!("copying tree {} to {}", from.display(), to.display()));
                copy_tree(&from, &to, options.preserve_symlinks, log)?;
                remove_tree(&from, RemoveOptions::default(), log);
            }
        } else {
            let moved = helpers::move_file(&from, &to)?;
            log.info(&format!("moved {} to {}", from.display(), moved.display()));
        }
    }
    Ok(())
}

/// Remove the directory tree at `dir`.
///
/// Failures are logged as warnings, never returned. With
/// [`RemoveOptions::empty_dirs`] and an absolute `dir`, the ancestors of
/// `dir` are then removed upward while they are empty; the file-system root
/// is never touched.
pub fn remove_tree(dir: &Path, options: RemoveOptions, log: &dyn Log) {
    if options.dry_run {
        log.dry_run(&format!("would remove {}", dir.display()));
        return;
    }
    match fs::remove_dir_all(dir) {
        Ok(()) => log.debug(&format!("removed {}", dir.display())),
        Err(e) => log.warn(&format!("error removing {}: {e}", dir.display())),
    }
    if !options.empty_dirs || !dir.is_absolute() {
        return;
    }
    for ancestor in dir.ancestors().skip(1) {
        if ancestor.parent().is_none() {
            break;
        }
        if !ancestor.exists() {
            continue;
        }
        if fs::remove_dir(ancestor).is_err() {
            break;
        }
        log.debug(&format!("removed empty directory {}", ancestor.display()));
    }
}

/// Remove every empty directory below `root`, deepest first, `root`
/// included.
///
/// Directories that become empty during the walk are removed too. Symlinks
/// are not followed.
pub fn remove_empty_dirs(root: &Path, log: &dyn Log) {
    let dirs = WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir());
    for entry in dirs {
        if fs::remove_dir(entry.path()).is_ok() {
            log.debug(&format!("removed empty directory {}", entry.path().display()));
        }
    }
}

/// Configuration directory belonging to an installation prefix.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use installer_utils::paths::prefix_to_etc;
///
/// assert_eq!(prefix_to_etc(Path::new("/usr")), PathBuf::from("/etc"));
/// assert_eq!(prefix_to_etc(Path::new("/opt/aster")), PathBuf::from("/opt/aster/etc"));
/// ```
#[must_use]
pub fn prefix_to_etc(prefix: &Path) -> PathBuf {
    if prefix == Path::new("/usr") {
        PathBuf::from("/etc")
    } else {
        prefix.join("etc")
    }
}
