#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for relocating and cleaning up an installation.
//!
//! An installation prefix is moved entry by entry to a new location, scripts
//! are made executable, and the old prefix is pruned.

mod common;

use std::fs;

use common::{InstallContext, write_file};
use installer_utils::logging::{Level, MemoryLog};
use installer_utils::paths::{
    MoveOptions, RemoveOptions, move_tree, prefix_to_etc, remove_empty_dirs, remove_tree,
};

const ENTRIES: [&str; 3] = ["lib/asrun", "bin/as_run", "etc/codeaster/asrun"];

#[test]
fn relocated_prefix_holds_every_entry() {
    let ctx = InstallContext::new();
    let target = tempfile::tempdir().unwrap();
    let dst = target.path().join("new-prefix");
    let log = MemoryLog::new();

    move_tree(ctx.prefix(), &ENTRIES, &dst, MoveOptions::default(), &log).unwrap();

    assert!(dst.join("lib/asrun/run.py").is_file());
    assert!(dst.join("bin/as_run").is_file());
    assert!(prefix_to_etc(&dst).join("codeaster/asrun").is_file());
    for entry in ENTRIES {
        assert!(!ctx.prefix().join(entry).exists(), "{entry} still in source");
    }

    remove_empty_dirs(ctx.prefix(), &log);
    assert!(!ctx.prefix().exists());
}

#[test]
fn dry_run_relocation_leaves_both_trees_alone() {
    let ctx = InstallContext::new();
    let target = tempfile::tempdir().unwrap();
    let dst = target.path().join("new-prefix");
    let log = MemoryLog::new();
    let options = MoveOptions {
        dry_run: true,
        ..MoveOptions::default()
    };

    move_tree(ctx.prefix(), &ENTRIES, &dst, options, &log).unwrap();

    assert!(!dst.exists());
    for entry in ENTRIES {
        assert!(ctx.prefix().join(entry).exists(), "{entry} was moved");
    }
    let planned = log.messages(Level::DryRun);
    assert!(planned.iter().any(|m| m.starts_with("would move")));
    assert!(planned.iter().any(|m| m.starts_with("would create directory")));
}

#[test]
fn cross_device_relocation_copies_directories() {
    let ctx = InstallContext::new();
    let target = tempfile::tempdir().unwrap();
    let options = MoveOptions {
        same_device: false,
        ..MoveOptions::default()
    };

    move_tree(ctx.prefix(), &["lib/asrun"], target.path(), options, &MemoryLog::new()).unwrap();

    assert_eq!(
        fs::read_to_string(target.path().join("lib/asrun/run.py")).unwrap(),
        "def main():\n    pass\n"
    );
    assert!(!ctx.prefix().join("lib/asrun").exists());
    assert!(ctx.prefix().join("lib").is_dir());
}

#[test]
fn uninstall_prunes_empty_parents() {
    let ctx = InstallContext::new();
    write_file(ctx.prefix(), "share/doc/asrun/README", "docs");
    let options = RemoveOptions {
        dry_run: false,
        empty_dirs: true,
    };

    remove_tree(&ctx.prefix().join("share/doc/asrun"), options, &MemoryLog::new());

    assert!(!ctx.prefix().join("share").exists());
    assert!(ctx.prefix().join("lib/asrun").is_dir());
}

#[cfg(unix)]
#[test]
fn relocated_scripts_become_executable() {
    use installer_utils::perms::chmod_scripts;
    use std::os::unix::fs::PermissionsExt;

    let ctx = InstallContext::new();
    let script = ctx.prefix().join("bin/as_run");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

    chmod_scripts(&[&script], &MemoryLog::new());

    let mode = fs::metadata(&script).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode, 0o755);
}
