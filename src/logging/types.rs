//! Core logging types: levels, recorded entries, and the [`Log`] trait.

/// Severity of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Diagnostic detail (suppressed on console unless verbose).
    Debug,
    /// Informational message.
    Info,
    /// Action that would have been taken outside a dry run.
    DryRun,
    /// Something unexpected that the operation recovered from.
    Warn,
    /// A failure the operation could not recover from.
    Error,
}

/// A single recorded log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity of the message.
    pub level: Level,
    /// Message text.
    pub message: String,
}

/// Abstraction over logging backends.
///
/// Every helper that reports progress takes a `&dyn Log`, so the caller owns
/// the logger's lifecycle. [`Logger`](super::logger::Logger) forwards to
/// `tracing`; [`MemoryLog`](super::memory::MemoryLog) keeps messages in memory.
#[cfg_attr(test, mockall::automock)]
pub trait Log: Send + Sync {
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}
