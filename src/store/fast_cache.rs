use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::helpers::time::now_millis;

/// Short-TTL key-value cache consulted before the durable store.
#[async_trait]
pub trait FastCache: Send + Sync {
    /// `Ok(None)` is a miss; expired entries are misses too.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
    async fn delete_multi(&self, keys: &[String]) -> Result<()>;
}

#[derive(Debug, Clone)]
struct CachedEntry {
    value: Vec<u8>,
    expires_at_unix_ms: i64,
}

/// In-process fast cache: key -> (value, expiration)
#[derive(Debug, Clone, Default)]
pub struct MemoryFastCache {
    inner: Arc<RwLock<HashMap<String, CachedEntry>>>,
}

impl MemoryFastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries, returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = now_millis();
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, entry| entry.expires_at_unix_ms > now);
        before - map.len()
    }
}

#[async_trait]
impl FastCache for MemoryFastCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = now_millis();
        let map = self.inner.read().await;
        Ok(map
            .get(key)
            .filter(|entry| now < entry.expires_at_unix_ms)
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let expires_at_unix_ms = now_millis().saturating_add(ttl.as_millis() as i64);
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), CachedEntry { value, expires_at_unix_ms });
        Ok(())
    }

    async fn delete_multi(&self, keys: &[String]) -> Result<()> {
        let mut map = self.inner.write().await;
        for key in keys {
            map.remove(key);
        }
        Ok(())
    }
}
