//! Injectable logging: the [`Log`] trait plus tracing-backed and in-memory
//! implementations.

mod logger;
mod memory;
mod subscriber;
mod types;
mod utils;

pub use logger::{DRY_RUN_TARGET, Logger};
pub use memory::MemoryLog;
pub use subscriber::init_subscriber;
#[cfg(test)]
pub use types::MockLog;
pub use types::{Level, Log, LogEntry};

/// Install an isolated per-thread subscriber with a [`FileLayer`] writing to
/// `<tempdir>/test.log`, so tests can inspect what reached the log file.
///
/// The returned guard must be kept alive for the duration of the test;
/// dropping it restores the previous thread-local dispatcher.
///
/// [`FileLayer`]: subscriber::FileLayer
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn test_subscriber() -> (tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let file_layer = subscriber::FileLayer::new(&tmp.path().join("test.log"))
        .expect("failed to create file layer");
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (tmp, guard)
}
