//! File-system primitives shared by the tree operations.
use anyhow::{Context as _, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::Log;

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        fs::remove_file(path).with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created, or on platforms without
/// Unix symlinks.
pub fn make_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!("linking {} -> {}", link.display(), target.display())
        })
    }

    #[cfg(not(unix))]
    {
        bail!(
            "cannot recreate symlink {} -> {}: unsupported on this platform",
            link.display(),
            target.display()
        )
    }
}

/// Recursively copy a directory tree.
///
/// When `preserve_symlinks` is `true`, symlinks in the source are recreated
/// as symlinks with the same target. Otherwise they are *followed*: directory
/// links are recursed into and file links are copied as regular files.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_tree(src: &Path, dst: &Path, preserve_symlinks: bool, log: &dyn Log) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let is_link = entry.file_type().is_ok_and(|t| t.is_symlink());
        if is_link && preserve_symlinks && cfg!(unix) {
            let target = fs::read_link(&src_path)
                .with_context(|| format!("reading link {}", src_path.display()))?;
            log.debug(&format!("linking {} -> {}", dst_path.display(), target.display()));
            remove_existing(&dst_path)?;
            make_symlink(&target, &dst_path)?;
        } else if src_path.is_dir() {
            copy_tree(&src_path, &dst_path, preserve_symlinks, log)?;
        } else {
            log.debug(&format!("copying {} -> {}", src_path.display(), dst_path.display()));
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// Move a single file, falling back to copy + remove when a rename is not
/// possible (e.g. across devices).
///
/// If `dst` is an existing directory the file is moved into it. Returns the
/// final destination path.
///
/// # Errors
///
/// Returns an error if the destination file already exists or the move
/// fails.
pub fn move_file(src: &Path, dst: &Path) -> Result<PathBuf> {
    let dst = match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst.to_path_buf(),
    };
    if dst.symlink_metadata().is_ok() {
        bail!(
            "can't move {}: destination {} already exists",
            src.display(),
            dst.display()
        );
    }
    if fs::rename(src, &dst).is_err() {
        fs::copy(src, &dst)
            .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
        fs::remove_file(src).with_context(|| format!("removing {}", src.display()))?;
    }
    Ok(dst)
}

/// Move a directory, falling back to copy + remove when a rename is not
/// possible.
///
/// If `dst` is an existing directory the source moves inside it. Returns the
/// final destination path.
///
/// # Errors
///
/// Returns an error if neither the rename nor the copy succeeds.
pub fn move_dir(src: &Path, dst: &Path, log: &dyn Log) -> Result<PathBuf> {
    let dst = match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst.to_path_buf(),
    };
    if let Err(e) = fs::rename(src, &dst) {
        log.debug(&format!("rename {} failed ({e}), copying", src.display()));
        copy_tree(src, &dst, true, log)?;
        fs::remove_dir_all(src).with_context(|| format!("removing {}", src.display()))?;
    }
    Ok(dst)
}
