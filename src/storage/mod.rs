//! Storage backends for persisted grants
//!
//! - Memory: in-process store for tests and embedded deployments
//! - Postgres: durable pooled store

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PostgresConfig, PostgresStore};

use crate::grants::{Grant, GrantFilter};
pub use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
}

/// Record store keyed by opaque string key.
///
/// Implementations delegate isolation and atomicity of individual
/// operations to the underlying engine. Failures are surfaced as-is:
/// no retries, no swallowing.
#[async_trait]
pub trait GrantBackend: Send + Sync {
    /// Insert the grant, fully replacing any existing record under its key
    async fn put(&self, grant: Grant) -> Result<(), StorageError>;

    /// Fetch the grant under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Grant>, StorageError>;

    /// All grants matching `filter`, in unspecified order
    async fn find(&self, filter: &GrantFilter) -> Result<Vec<Grant>, StorageError>;

    /// Delete the grant under `key`; a no-op if absent
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every grant matching `filter`, returning the number deleted
    async fn delete_matching(&self, filter: &GrantFilter) -> Result<u64, StorageError>;

    /// Delete every grant whose expiration is strictly before `as_of`,
    /// returning the number deleted
    async fn delete_expired(&self, as_of: DateTime<Utc>) -> Result<u64, StorageError>;
}
