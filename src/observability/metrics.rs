use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_ERROR: &str = "error";
pub const OUTCOME_NOT_FOUND: &str = "not_found";

pub const CACHE_HIT: &str = "hit";
pub const CACHE_MISS: &str = "miss";

pub const TARGET_CACHE: &str = "cache";
pub const TARGET_ACCOUNT: &str = "account";
pub const TARGET_SESSION: &str = "session";
pub const TARGET_PROPERTY: &str = "property";

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Badge metrics
    pub badge_requests: IntCounterVec,

    // Resolution metrics
    pub cache_lookups: IntCounterVec,
    pub upstream_fetches: IntCounterVec,
    pub upstream_fetch_duration: Histogram,
    pub token_refreshes: IntCounter,
    pub persistence_warnings: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("analyticsbadge".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            badge_requests: IntCounterVec::new(Opts::new("badge_requests_total", "Badge requests by outcome"),&["outcome"],).unwrap(),

            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Fast cache lookups by result"),&["result"],).unwrap(),
            upstream_fetches: IntCounterVec::new(Opts::new("upstream_fetches_total", "Analytics API fetches by outcome"),&["outcome"],).unwrap(),
            upstream_fetch_duration: Histogram::with_opts(HistogramOpts::new("upstream_fetch_duration_seconds", "Analytics API fetch duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])).unwrap(),
            token_refreshes: IntCounter::new("token_refreshes_total", "Account credentials re-persisted after a refresh").unwrap(),
            persistence_warnings: IntCounterVec::new(Opts::new("persistence_warnings_total", "Non-fatal write failures by target"),&["target"],).unwrap(),

            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors during startup",).unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.badge_requests.clone())).unwrap();
        reg.register(Box::new(metrics.cache_lookups.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_fetches.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_refreshes.clone())).unwrap();
        reg.register(Box::new(metrics.persistence_warnings.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
