use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{Account, Property};
use crate::store::durable_store::{DurableStore, Records};

/// Durable store persisted as a single JSON snapshot, rewritten atomically (tmp -> rename) on every put.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: RwLock<Records>,
}

impl JsonFileStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Records::default(),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("invalid store file '{}'", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("store file '{}' not found, starting empty", path.display());
                Records::default()
            }
            Err(err) => return Err(err).with_context(|| format!("read store file '{}'", path.display())),
        };
        debug!(
            "store opened: {} accounts, {} properties",
            records.accounts.len(),
            records.properties.len()
        );
        Ok(Self { path, inner: RwLock::new(records) })
    }

    async fn persist(&self, records: &Records) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        let content = serde_json::to_vec_pretty(records)?;
        fs::write(&tmp, content).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace store file '{}'", self.path.display()))
    }
}

#[async_trait]
impl DurableStore for JsonFileStore {
    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        Ok(self.inner.read().await.accounts.get(username).cloned())
    }

    async fn put_account(&self, account: &Account) -> Result<()> {
        let mut records = self.inner.write().await;
        let mut next = records.clone();
        next.insert_account(account);
        self.persist(&next).await?;
        *records = next;
        Ok(())
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        Ok(self.inner.read().await.properties.get(id).cloned())
    }

    async fn put_properties(&self, properties: &[Property]) -> Result<()> {
        let mut records = self.inner.write().await;
        let mut next = records.clone();
        next.insert_properties(properties);
        self.persist(&next).await?;
        *records = next;
        Ok(())
    }

    async fn properties_by_owner(&self, username: &str) -> Result<Vec<Property>> {
        Ok(self.inner.read().await.owned_by(username))
    }
}
