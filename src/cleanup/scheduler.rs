//! Periodic deletion of expired grants

use crate::cleanup::{LogObserver, SweepObserver};
use crate::grants::GrantStore;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

/// Sweep interval used when none is configured
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("sweep interval must be at least 1 second")]
    IntervalTooShort,

    #[error("already started, call stop first")]
    AlreadyStarted,

    #[error("not started, call start first")]
    NotStarted,
}

/// Cleanup configuration
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Seconds between sweeps; must be at least 1
    pub interval_secs: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl CleanupConfig {
    /// Read the interval from `GRANTVAULT_SWEEP_INTERVAL`, falling back to
    /// the default when unset or unparseable
    pub fn from_env() -> Self {
        let interval_secs = std::env::var("GRANTVAULT_SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

        Self { interval_secs }
    }
}

/// Periodically deletes expired grants in a background task.
///
/// One worker per instance, spawned by [`start`](Self::start) and signaled
/// by [`stop`](Self::stop). Both only flip the state slot and touch the
/// cancellation channel; neither waits for the worker, and an in-flight
/// sweep always runs to completion. Dropping the scheduler also signals the
/// worker to exit.
pub struct CleanupScheduler {
    store: Arc<GrantStore>,
    interval: Duration,
    observer: Arc<dyn SweepObserver>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl CleanupScheduler {
    /// Create a scheduler sweeping every `config.interval_secs` seconds.
    /// Fails fast if the interval is below 1 second.
    pub fn new(store: Arc<GrantStore>, config: CleanupConfig) -> Result<Self, CleanupError> {
        if config.interval_secs < 1 {
            return Err(CleanupError::IntervalTooShort);
        }

        Ok(Self {
            store,
            interval: Duration::from_secs(config.interval_secs),
            observer: Arc::new(LogObserver),
            shutdown: Mutex::new(None),
        })
    }

    /// Replace the default tracing observer
    pub fn with_observer(mut self, observer: Arc<dyn SweepObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Whether a worker is currently running
    pub fn is_running(&self) -> bool {
        self.shutdown.lock().is_some()
    }

    /// Spawn the background worker. Must be called from within a tokio
    /// runtime. Fails if a worker is already running.
    pub fn start(&self) -> Result<(), CleanupError> {
        let mut shutdown = self.shutdown.lock();
        if shutdown.is_some() {
            return Err(CleanupError::AlreadyStarted);
        }

        let (tx, rx) = watch::channel(false);
        tokio::spawn(run(
            self.store.clone(),
            self.interval,
            self.observer.clone(),
            rx,
        ));

        *shutdown = Some(tx);
        debug!(interval_secs = self.interval.as_secs(), "grant cleanup started");
        Ok(())
    }

    /// Signal the worker to exit. Fails if none is running.
    ///
    /// Returns without waiting: the worker exits at its next cancellation
    /// checkpoint, finishing any sweep already in progress first. A fresh
    /// worker can be started again afterwards.
    pub fn stop(&self) -> Result<(), CleanupError> {
        let tx = self
            .shutdown
            .lock()
            .take()
            .ok_or(CleanupError::NotStarted)?;

        let _ = tx.send(true);
        debug!("grant cleanup stopped");
        Ok(())
    }
}

async fn run(
    store: Arc<GrantStore>,
    interval: Duration,
    observer: Arc<dyn SweepObserver>,
    mut signal: watch::Receiver<bool>,
) {
    loop {
        if *signal.borrow() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = signal.changed() => {
                // Sender gone means the scheduler itself was dropped
                if changed.is_err() {
                    break;
                }
            }
        }

        if *signal.borrow() {
            break;
        }

        sweep(&store, observer.as_ref()).await;
    }
}

/// One sweep: a single delete-expired call, run to completion. Errors are
/// reported to the observer and contained here so the loop outlives a
/// misbehaving backend.
async fn sweep(store: &GrantStore, observer: &dyn SweepObserver) {
    observer.sweep_started();

    match store.remove_expired(Utc::now()).await {
        Ok(removed) => observer.sweep_completed(removed),
        Err(error) => observer.sweep_failed(&error),
    }
}
