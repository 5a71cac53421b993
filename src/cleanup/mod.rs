//! Background cleanup of expired grants
//!
//! One periodic worker per scheduler instance. Sweep failures are reported
//! to the observer and contained; they never stop the loop and never reach
//! the caller that started it.

mod observer;
mod scheduler;

pub use observer::{LogObserver, SweepObserver};
pub use scheduler::{CleanupConfig, CleanupError, CleanupScheduler, DEFAULT_SWEEP_INTERVAL_SECS};
