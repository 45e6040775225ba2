//! Rule name caching.
//!
//! The key-value store itself is an external collaborator reached through
//! [`KvStore`]. [`RuleCache`] adds the `rule:` namespace, the configured TTL,
//! and the rule that store failures never reach the request: reads degrade to
//! a miss and writes to a no-op.

pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::observability::metrics;

pub use memory::MemoryStore;

/// Errors reported by a key-value store backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error("cache operation failed for key '{key}': {message}")]
    Operation { key: String, message: String },
}

/// Minimal get/put interface of an expiring key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Cache key for a rule identifier.
pub fn rule_key(rule_id: &str) -> String {
    format!("rule:{}", rule_id)
}

/// Namespaced, fault-tolerant view of a [`KvStore`] for rule names.
#[derive(Clone)]
pub struct RuleCache {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl RuleCache {
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached display name, or `None` on a miss or store failure.
    pub async fn get(&self, rule_id: &str) -> Option<String> {
        let key = rule_key(rule_id);
        match self.store.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                metrics::record_cache_error("get");
                None
            }
        }
    }

    /// Store a display name with the configured TTL. Failures are logged only.
    pub async fn put(&self, rule_id: &str, name: &str) {
        let key = rule_key(rule_id);
        if let Err(e) = self.store.put(&key, name, self.ttl).await {
            tracing::warn!(key = %key, error = %e, "Cache write failed, skipping");
            metrics::record_cache_error("put");
        }
    }
}
