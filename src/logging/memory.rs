//! In-memory logger that records messages for later inspection or replay.
use std::sync::Mutex;

use super::logger::DRY_RUN_TARGET;
use super::types::{Level, Log, LogEntry};

impl LogEntry {
    /// Replay this entry through `tracing`.
    fn replay(&self) {
        let msg = &self.message;
        match self.level {
            Level::Debug => tracing::debug!("{msg}"),
            Level::Info => tracing::info!("{msg}"),
            Level::DryRun => tracing::info!(target: DRY_RUN_TARGET, "{msg}"),
            Level::Warn => tracing::warn!("{msg}"),
            Level::Error => tracing::error!("{msg}"),
        }
    }
}

/// Implement the methods of [`Log`] by pushing each message into
/// `self.entries` with the corresponding [`Level`].
macro_rules! record_log_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.push(Level::$level, msg);
            }
        )+
    };
}

/// Logger that keeps every message in memory.
///
/// Useful when the caller wants to show the messages of one operation as a
/// block, or to inspect what a helper reported (skipped entries, warnings).
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Create an empty in-memory logger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(LogEntry {
                level,
                message: msg.to_string(),
            });
        }
    }

    /// Return a copy of all recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Return the messages recorded at exactly `level`.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Replay all recorded entries through `tracing` and clear the buffer.
    pub fn flush(&self) {
        let entries = match self.entries.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => return,
        };
        for entry in &entries {
            entry.replay();
        }
    }
}

impl Log for MemoryLog {
    record_log_methods! {
        info    => Info,
        debug   => Debug,
        warn    => Warn,
        error   => Error,
        dry_run => DryRun,
    }
}
