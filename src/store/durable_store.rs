use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Account, Property};

/// Persistent keyed-record store for accounts (by username) and properties (by badge id).
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get_account(&self, username: &str) -> Result<Option<Account>>;
    async fn put_account(&self, account: &Account) -> Result<()>;
    async fn get_property(&self, id: &str) -> Result<Option<Property>>;
    /// Batch write; an existing property with the same id is overwritten.
    async fn put_properties(&self, properties: &[Property]) -> Result<()>;
    async fn properties_by_owner(&self, username: &str) -> Result<Vec<Property>>;
}

/// Record tables shared by the in-memory and file-backed stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub accounts: BTreeMap<String, Account>,
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
}

impl Records {
    pub fn insert_account(&mut self, account: &Account) {
        self.accounts.insert(account.username.clone(), account.clone());
    }

    pub fn insert_properties(&mut self, properties: &[Property]) {
        for property in properties {
            self.properties.insert(property.id.clone(), property.clone());
        }
    }

    pub fn owned_by(&self, username: &str) -> Vec<Property> {
        self.properties
            .values()
            .filter(|property| property.owner == username)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDurableStore {
    inner: Arc<RwLock<Records>>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Records) -> Self {
        Self { inner: Arc::new(RwLock::new(records)) }
    }
}

#[async_trait]
impl DurableStore for MemoryDurableStore {
    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        Ok(self.inner.read().await.accounts.get(username).cloned())
    }

    async fn put_account(&self, account: &Account) -> Result<()> {
        self.inner.write().await.insert_account(account);
        Ok(())
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        Ok(self.inner.read().await.properties.get(id).cloned())
    }

    async fn put_properties(&self, properties: &[Property]) -> Result<()> {
        self.inner.write().await.insert_properties(properties);
        Ok(())
    }

    async fn properties_by_owner(&self, username: &str) -> Result<Vec<Property>> {
        Ok(self.inner.read().await.owned_by(username))
    }
}
