// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::analytics::{AnalyticsClient, MetricFetcher, ReportWindow};
use crate::config::types::ServiceConfig;
use crate::domain::{Account, Credential, Property};
use crate::oauth::{Authorized, OAuthClient};
use crate::server::server::AppState;
use crate::store::{DurableStore, FastCache, MemoryDurableStore, MemoryFastCache};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Redirects are not followed so tests can inspect `Location` and `Set-Cookie`.
pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

/// Minimal valid config pointing every upstream at `upstream_base`.
pub fn service_config(upstream_base: &str) -> ServiceConfig {
    let yaml = format!(
        r#"
settings:
  server:
    host: 127.0.0.1
    port: "0"
  metrics:
    is_enabled: true
oauth:
  client_id: test-client
  client_secret: test-secret
  redirect_uri: http://127.0.0.1/oauth
  auth_uri: {base}/auth
  token_uri: {base}/token
analytics:
  data_url: {base}/analytics/v3/data/ga
  management_url: {base}/analytics/v3/management
"#,
        base = upstream_base
    );
    serde_yaml::from_str(&yaml).expect("test config")
}

pub fn oauth_client(config: &ServiceConfig) -> OAuthClient {
    OAuthClient::new(build_reqwest_client(), config.oauth.clone())
}

pub fn analytics_client(config: &ServiceConfig) -> AnalyticsClient {
    AnalyticsClient::new(build_reqwest_client(), oauth_client(config), config.analytics.clone())
}

/// App state over in-memory stores with a scripted metric fetcher.
pub async fn app_state(
    config: &ServiceConfig,
    fast_cache: Arc<dyn FastCache>,
    store: Arc<dyn DurableStore>,
    fetcher: Arc<dyn MetricFetcher>,
) -> AppState {
    let analytics = Arc::new(analytics_client(config));
    AppState::assemble(config, fast_cache, store, oauth_client(config), analytics, fetcher).await
}

pub fn credential(access: &str, refresh: &str) -> Credential {
    Credential::new(access.to_string(), refresh.to_string(), None)
}

/// Store with account `alice` owning property `p1` -> profile `123`.
pub async fn seeded_store() -> MemoryDurableStore {
    let store = MemoryDurableStore::new();
    store.put_account(&Account::new("alice", credential("access-1", "refresh-1"))).await.unwrap();
    store.put_properties(&[Property::new("p1", "alice", "123")]).await.unwrap();
    store
}

/// Fast cache that counts calls and can be told to fail writes.
#[derive(Default)]
pub struct CountingFastCache {
    pub inner: MemoryFastCache,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub last_ttl: Mutex<Option<Duration>>,
    pub fail_writes: bool,
}

impl CountingFastCache {
    pub fn failing_writes() -> Self {
        Self { fail_writes: true, ..Default::default() }
    }

    pub async fn seed(&self, key: &str, value: &str) {
        self.inner.set(key, value.as_bytes().to_vec(), Duration::from_secs(60)).await.unwrap();
    }

    pub async fn value(&self, key: &str) -> Option<String> {
        self.inner
            .get(key)
            .await
            .unwrap()
            .map(|bytes| String::from_utf8(bytes).unwrap())
    }
}

#[async_trait]
impl FastCache for CountingFastCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        *self.last_ttl.lock().unwrap() = Some(ttl);
        if self.fail_writes {
            return Err(anyhow!("cache unavailable"));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete_multi(&self, keys: &[String]) -> Result<()> {
        self.inner.delete_multi(keys).await
    }
}

/// Durable store that counts reads and account writes, and can be told to fail the latter.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryDurableStore,
    pub reads: AtomicUsize,
    pub account_puts: AtomicUsize,
    pub fail_account_writes: bool,
}

impl CountingStore {
    pub fn new(inner: MemoryDurableStore) -> Self {
        Self { inner, ..Default::default() }
    }

    pub fn failing_account_writes(inner: MemoryDurableStore) -> Self {
        Self { inner, fail_account_writes: true, ..Default::default() }
    }
}

#[async_trait]
impl DurableStore for CountingStore {
    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_account(username).await
    }

    async fn put_account(&self, account: &Account) -> Result<()> {
        self.account_puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_account_writes {
            return Err(anyhow!("store unavailable"));
        }
        self.inner.put_account(account).await
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_property(id).await
    }

    async fn put_properties(&self, properties: &[Property]) -> Result<()> {
        self.inner.put_properties(properties).await
    }

    async fn properties_by_owner(&self, username: &str) -> Result<Vec<Property>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.properties_by_owner(username).await
    }
}

pub enum Script {
    /// `ga:users` total and the credential the client ends up holding (`None` = untouched).
    Total(String, Option<Credential>),
    /// Totals row without `ga:users`.
    NoTotals,
    Fail(String),
}

/// Metric fetcher returning a fixed answer and recording what it was asked.
pub struct ScriptedFetcher {
    script: Script,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<(Option<Credential>, String, ReportWindow)>>,
}

impl ScriptedFetcher {
    pub fn new(script: Script) -> Self {
        Self { script, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) }
    }

    pub fn total(total: &str) -> Self {
        Self::new(Script::Total(total.to_string(), None))
    }
}

#[async_trait]
impl MetricFetcher for ScriptedFetcher {
    async fn fetch_users(
        &self,
        credential: Option<Credential>,
        profile_ref: &str,
        window: &ReportWindow,
    ) -> Result<Authorized<HashMap<String, String>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((credential.clone(), profile_ref.to_string(), window.clone()));
        match &self.script {
            Script::Total(total, refreshed) => {
                let totals = HashMap::from([("ga:users".to_string(), total.clone())]);
                Ok(Authorized::new(totals, refreshed.clone().or(credential)))
            }
            Script::NoTotals => Ok(Authorized::new(HashMap::new(), credential)),
            Script::Fail(message) => Err(anyhow!(message.clone())),
        }
    }
}
