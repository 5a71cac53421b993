//! In-memory grant storage

use crate::grants::{Grant, GrantFilter};
use crate::storage::{GrantBackend, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-process backend over a keyed map.
///
/// Grants do not survive a restart. Each operation holds the lock for its
/// duration, so individual operations are atomic with respect to each other.
#[derive(Default)]
pub struct MemoryStore {
    grants: RwLock<HashMap<String, Grant>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of grants currently held
    pub fn len(&self) -> usize {
        self.grants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.read().is_empty()
    }
}

#[async_trait]
impl GrantBackend for MemoryStore {
    async fn put(&self, grant: Grant) -> Result<(), StorageError> {
        self.grants.write().insert(grant.key.clone(), grant);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Grant>, StorageError> {
        Ok(self.grants.read().get(key).cloned())
    }

    async fn find(&self, filter: &GrantFilter) -> Result<Vec<Grant>, StorageError> {
        Ok(self
            .grants
            .read()
            .values()
            .filter(|grant| filter.matches(grant))
            .cloned()
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.grants.write().remove(key);
        Ok(())
    }

    async fn delete_matching(&self, filter: &GrantFilter) -> Result<u64, StorageError> {
        let mut grants = self.grants.write();
        let before = grants.len();
        grants.retain(|_, grant| !filter.matches(grant));
        Ok((before - grants.len()) as u64)
    }

    async fn delete_expired(&self, as_of: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut grants = self.grants.write();
        let before = grants.len();
        grants.retain(|_, grant| !grant.is_expired_at(as_of));
        Ok((before - grants.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn grant(key: &str, subject: &str, expiration: Option<DateTime<Utc>>) -> Grant {
        Grant {
            key: key.to_string(),
            grant_type: "refresh_token".to_string(),
            client_id: "web".to_string(),
            subject_id: Some(subject.to_string()),
            creation_time: Utc::now(),
            expiration,
            data: "{}".to_string(),
        }
    }

    #[tokio::test]
    async fn test_put_replaces_existing_key() {
        let store = MemoryStore::new();

        store.put(grant("k1", "alice", None)).await.unwrap();
        let mut updated = grant("k1", "alice", None);
        updated.data = r#"{"v":2}"#.to_string();
        store.put(updated.clone()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k1").await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_noop() {
        let store = MemoryStore::new();
        store.put(grant("k1", "alice", None)).await.unwrap();

        store.delete("no-such-key").await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_matching_counts() {
        let store = MemoryStore::new();
        store.put(grant("k1", "alice", None)).await.unwrap();
        store.put(grant("k2", "alice", None)).await.unwrap();
        store.put(grant("k3", "bob", None)).await.unwrap();

        let removed = store
            .delete_matching(&GrantFilter::for_subject("alice"))
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("k3").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_expired_leaves_unexpired_and_eternal() {
        let store = MemoryStore::new();
        let now = Utc::now();

        store
            .put(grant("expired", "alice", Some(now - Duration::seconds(10))))
            .await
            .unwrap();
        store
            .put(grant("at-boundary", "alice", Some(now)))
            .await
            .unwrap();
        store
            .put(grant("future", "alice", Some(now + Duration::seconds(10))))
            .await
            .unwrap();
        store.put(grant("eternal", "alice", None)).await.unwrap();

        let removed = store.delete_expired(now).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("expired").await.unwrap().is_none());
        assert!(store.get("at-boundary").await.unwrap().is_some());
        assert!(store.get("future").await.unwrap().is_some());
        assert!(store.get("eternal").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_returns_empty_when_nothing_matches() {
        let store = MemoryStore::new();
        store.put(grant("k1", "alice", None)).await.unwrap();

        let found = store
            .find(&GrantFilter::for_subject("nobody"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
