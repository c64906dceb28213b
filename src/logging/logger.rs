//! Logger that forwards every message to `tracing`.
use super::types::Log;

/// Target used for dry-run messages so formatters can tag them.
pub const DRY_RUN_TARGET: &str = "installer_utils::dry_run";

/// Implement [`Log`] by delegating to inherent methods of the same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger backed by the global `tracing` dispatcher.
///
/// Install a subscriber with [`init_subscriber`](super::subscriber::init_subscriber)
/// (or any other) to see the output; without one the messages are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Logger {
    /// Create a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(info, debug, warn, error, dry_run);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::test_subscriber;

    #[test]
    fn logger_writes_all_levels_through_tracing() {
        let (dir, guard) = test_subscriber();
        let log = Logger::new();
        log.info("info message");
        log.debug("debug message");
        log.warn("warn message");
        log.error("error message");
        log.dry_run("would move a to b");
        drop(guard);

        let content = std::fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert!(content.contains("info message"));
        assert!(content.contains("[debug] debug message"));
        assert!(content.contains("[warn] warn message"));
        assert!(content.contains("[error] error message"));
        assert!(content.contains("[dry run] would move a to b"));
    }

    #[test]
    fn logger_usable_as_trait_object() {
        let log: &dyn Log = &Logger;
        log.info("through trait object");
    }
}
