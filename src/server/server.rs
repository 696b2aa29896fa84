use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use reqwest::Client;
use tracing::info;

use crate::analytics::{AnalyticsClient, MetricFetcher};
use crate::config::settings::SettingsConfig;
use crate::config::types::ServiceConfig;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::oauth::OAuthClient;
use crate::resolver::TieredCache;
use crate::store::{DurableStore, FastCache, JsonFileStore, MemoryDurableStore};
use crate::web::{badge, index, manage, oauth};

/// Request-handler dependencies, built once from the loaded config.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsConfig>,
    pub resolver: TieredCache,
    pub fast_cache: Arc<dyn FastCache>,
    pub store: Arc<dyn DurableStore>,
    pub oauth: OAuthClient,
    pub analytics: Arc<AnalyticsClient>,
    pub metrics_state: MetricsState,
}

impl AppState {
    /// Wire the production collaborators: the analytics client doubles as the metric fetcher.
    pub async fn build(
        config: &ServiceConfig,
        fast_cache: Arc<dyn FastCache>,
        store: Arc<dyn DurableStore>,
    ) -> Result<Self> {
        let http = Client::builder().build()?;
        let oauth = OAuthClient::new(http.clone(), config.oauth.clone());
        let analytics = Arc::new(AnalyticsClient::new(http, oauth.clone(), config.analytics.clone()));
        let fetcher: Arc<dyn MetricFetcher> = analytics.clone();
        Ok(Self::assemble(config, fast_cache, store, oauth, analytics, fetcher).await)
    }

    pub async fn assemble(
        config: &ServiceConfig,
        fast_cache: Arc<dyn FastCache>,
        store: Arc<dyn DurableStore>,
        oauth: OAuthClient,
        analytics: Arc<AnalyticsClient>,
        fetcher: Arc<dyn MetricFetcher>,
    ) -> Self {
        let metrics = get_metrics().await;
        let resolver = TieredCache::new(
            fast_cache.clone(),
            store.clone(),
            fetcher,
            Duration::from_secs(config.settings.cache.metric_ttl_seconds),
        );
        Self {
            settings: Arc::new(config.settings.clone()),
            resolver,
            fast_cache,
            store,
            oauth,
            analytics,
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }
}

/// JSON file store when `storage.path` is set, in-memory otherwise.
pub async fn open_store(config: &ServiceConfig) -> Result<Arc<dyn DurableStore>> {
    Ok(match &config.storage.path {
        Some(path) => {
            info!("durable store: json file '{}'", path);
            Arc::new(JsonFileStore::open(path).await?)
        }
        None => {
            info!("durable store: in-memory");
            Arc::new(MemoryDurableStore::new())
        }
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/badge/{file}", get(badge::badge))
        .route("/oauth", get(oauth::oauth_callback))
        .route("/manage", get(manage::manage).post(manage::register_properties))
        .merge(state.metrics_state.router(&state.settings.metrics))
        .with_state(state)
}

/// Start one Axum server for badges, account linking and metrics.
pub async fn start(state: AppState) -> Result<()> {
    let metrics = get_metrics().await;
    let bind_addr = format!("{}:{}", state.settings.server.host, state.settings.server.port);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on {}", bind_addr);
    metrics.up.set(1);
    axum::serve(listener, app).await?;
    metrics.up.set(0);

    Ok(())
}
