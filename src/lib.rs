//! Installer utilities.
//!
//! Building blocks for installation scripts that configure a software
//! package in place:
//!
//! - **[`rcfile`]**: read and rewrite line-oriented `key : value` resource files
//! - **[`version`]**: order dotted version strings and dispatch on them
//! - **[`paths`]**: move and remove directory trees, with dry-run support
//! - **[`text_match`]**: pull configuration values out of files by regex
//! - **[`diff`]**, **[`backup`]**, **[`perms`]**: diffs, backup names, script modes
//! - **[`prompt`]**: interpret yes/no answers
//!
//! Which resource-file fields repeat and how they are written back is data,
//! described by a [`config::RcSchema`]. Every operation that reports progress
//! takes a [`logging::Log`].
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod backup;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod paths;
pub mod perms;
pub mod prompt;
pub mod rcfile;
pub mod text_match;
pub mod version;
