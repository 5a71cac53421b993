//! Sweep observability

use crate::storage::StorageError;
use tracing::{debug, error, info};

/// Sink for cleanup sweep events.
///
/// The scheduler reports every sweep here instead of surfacing errors to
/// its caller; implementations decide what to do with them. Called from the
/// background worker, so implementations must not block for long.
pub trait SweepObserver: Send + Sync {
    /// A sweep is about to run
    fn sweep_started(&self);

    /// The sweep failed; the next tick still proceeds on schedule
    fn sweep_failed(&self, error: &StorageError);

    /// The sweep finished, deleting `removed` grants
    fn sweep_completed(&self, removed: u64);
}

/// Default observer: forwards sweep events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SweepObserver for LogObserver {
    fn sweep_started(&self) {
        debug!("grant cleanup sweep started");
    }

    fn sweep_failed(&self, error: &StorageError) {
        error!(error = %error, "grant cleanup sweep failed");
    }

    fn sweep_completed(&self, removed: u64) {
        info!(removed, "grant cleanup sweep completed");
    }
}
