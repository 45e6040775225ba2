//! In-process expiring key-value store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::cache::{CacheError, KvStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// A thread-safe TTL store. Expired entries are dropped when next read and
/// by [`MemoryStore::purge_expired`], which [`MemoryStore::spawn_sweeper`]
/// runs periodically.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.inner, Instant::now())
    }

    /// Purge expired entries every `period` until the store is dropped.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let inner: Weak<DashMap<String, Entry>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(map) = inner.upgrade() else {
                    tracing::debug!("Cache store dropped, stopping sweeper");
                    break;
                };
                let removed = purge(&map, Instant::now());
                if removed > 0 {
                    tracing::debug!(removed, remaining = map.len(), "Swept expired cache entries");
                }
            }
        })
    }
}

fn purge(map: &DashMap<String, Entry>, now: Instant) -> usize {
    let before = map.len();
    map.retain(|_, entry| entry.expires_at > now);
    before.saturating_sub(map.len())
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let hit = self
            .inner
            .get(key)
            .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));

        match hit {
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => {
                self.inner.remove_if(key, |_, entry| entry.expires_at <= now);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Operation {
                key: key.to_string(),
                message: format!("ttl {:?} out of range", ttl),
            })?;
        self.inner.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("rule:1", "Old", Duration::from_secs(60)).await.unwrap();
        store.put("rule:1", "New", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("rule:1").await.unwrap().as_deref(), Some("New"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted_on_read() {
        let store = MemoryStore::new();
        store.put("rule:1", "Gone", Duration::ZERO).await.unwrap();
        assert_eq!(store.len(), 1);

        assert_eq!(store.get("rule:1").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_read_does_not_refresh_ttl() {
        let store = MemoryStore::new();
        store.put("rule:1", "Brief", Duration::from_millis(50)).await.unwrap();
        assert!(store.get("rule:1").await.unwrap().is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(store.get("rule:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_absurd_ttl_is_an_error() {
        let store = MemoryStore::new();
        let err = store.put("rule:1", "x", Duration::MAX).await.unwrap_err();
        assert!(matches!(err, CacheError::Operation { .. }));
    }

    #[tokio::test]
    async fn test_purge_drops_only_expired() {
        let store = MemoryStore::new();
        store.put("rule:old", "Gone", Duration::ZERO).await.unwrap();
        store.put("rule:new", "Kept", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("rule:new").await.unwrap().as_deref(), Some("Kept"));
    }

    #[tokio::test]
    async fn test_sweeper_evicts_unread_entries() {
        let store = MemoryStore::new();
        let sweeper = store.spawn_sweeper(Duration::from_millis(20));
        store.put("rule:1", "Never read", Duration::ZERO).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.is_empty());

        drop(store);
        tokio::time::timeout(Duration::from_secs(1), sweeper)
            .await
            .expect("sweeper should stop once the store is gone")
            .unwrap();
    }
}
