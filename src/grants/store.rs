//! Grant store façade

use crate::grants::{Grant, GrantFilter};
use crate::storage::{GrantBackend, StorageError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Keyed and filtered CRUD over persisted grants.
///
/// Thin façade over an injected storage backend. Every operation is durable:
/// a call returns only after the underlying write or delete has committed.
/// Backend failures propagate to the caller unmodified; this layer neither
/// retries nor swallows them.
#[derive(Clone)]
pub struct GrantStore {
    backend: Arc<dyn GrantBackend>,
}

impl GrantStore {
    pub fn new(backend: Arc<dyn GrantBackend>) -> Self {
        Self { backend }
    }

    /// Store a grant, fully replacing any existing record under its key.
    pub async fn store(&self, grant: Grant) -> Result<(), StorageError> {
        debug!(key = %grant.key, grant_type = %grant.grant_type, "storing grant");
        self.backend.put(grant).await
    }

    /// Fetch the grant under `key`. Absence is `Ok(None)`, never an error.
    pub async fn get(&self, key: &str) -> Result<Option<Grant>, StorageError> {
        self.backend.get(key).await
    }

    /// All grants matching the filter, in unspecified order. An empty vec,
    /// not an error, when none match.
    pub async fn get_all(&self, filter: &GrantFilter) -> Result<Vec<Grant>, StorageError> {
        self.backend.find(filter).await
    }

    /// Delete the grant under `key`; a no-op if absent.
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        debug!(key = %key, "removing grant");
        self.backend.delete(key).await
    }

    /// Delete every grant matching the filter; a no-op if none match.
    pub async fn remove_all(&self, filter: &GrantFilter) -> Result<(), StorageError> {
        let removed = self.backend.delete_matching(filter).await?;
        debug!(removed, subject_id = %filter.subject_id(), "removed grants by filter");
        Ok(())
    }

    /// Delete every grant whose expiration is strictly before `as_of`,
    /// returning the number deleted. Grants without an expiration are left
    /// untouched.
    ///
    /// This is the cleanup scheduler's sweep path, but it is first-class:
    /// callers may invoke it directly.
    pub async fn remove_expired(&self, as_of: DateTime<Utc>) -> Result<u64, StorageError> {
        self.backend.delete_expired(as_of).await
    }
}
