// Shared helpers for integration tests.
//
// Provides a temporary installation prefix laid out the way an installed
// package looks on disk, so each integration test can work on an isolated
// copy without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Resource file shipped with the package, before configuration.
pub const ASRUN_TEMPLATE: &str = "\
# Code_Aster configuration
mem_max : ?MEM_MAX?
#editor : vi
protocol_exec : asrun.plugins.server.SSHServer

# available versions
#?vers : VVV?
vers : testing

# nodes of the cluster
noeud : localhost
";

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, content).expect("write file");
    path
}

/// An isolated installation prefix backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct InstallContext {
    /// Temporary directory holding the prefix.
    pub root: tempfile::TempDir,
}

impl InstallContext {
    /// Create a prefix containing `etc/codeaster/asrun`, a Python package
    /// under `lib/` and a script under `bin/`.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        write_file(root.path(), "etc/codeaster/asrun", ASRUN_TEMPLATE);
        write_file(root.path(), "lib/asrun/__init__.py", "");
        write_file(root.path(), "lib/asrun/run.py", "def main():\n    pass\n");
        write_file(root.path(), "bin/as_run", "#!/bin/sh\nexec python -m asrun \"$@\"\n");
        Self { root }
    }

    /// Path to the prefix.
    pub fn prefix(&self) -> &Path {
        self.root.path()
    }

    /// Path to the installed resource file.
    pub fn asrun(&self) -> PathBuf {
        self.prefix().join("etc/codeaster/asrun")
    }

    /// Read a file below the prefix.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.prefix().join(rel)).expect("read file")
    }
}
