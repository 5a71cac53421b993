//! Grantvault - persisted grant storage with background expiry cleanup
//!
//! Stores the short-lived security artifacts an identity service issues
//! (authorization codes, refresh tokens, consent records, device codes) and
//! deletes expired ones on a periodic background sweep. Storage is pluggable
//! behind the [`GrantBackend`] trait; in-memory and PostgreSQL backends are
//! provided.

pub mod cleanup;
pub mod grants;
pub mod storage;

pub use cleanup::{CleanupConfig, CleanupError, CleanupScheduler, LogObserver, SweepObserver};
pub use grants::{Grant, GrantFilter, GrantStore};
pub use storage::{GrantBackend, MemoryStore, PostgresConfig, PostgresStore, StorageError};
