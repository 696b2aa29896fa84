use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::analytics::fetcher::{MetricFetcher, ReportWindow};
use crate::domain::Property;
use crate::error::ResolveError;
use crate::observability::metrics::{
    get_metrics, CACHE_HIT, CACHE_MISS, OUTCOME_ERROR, OUTCOME_OK, TARGET_ACCOUNT, TARGET_CACHE,
};
use crate::store::{DurableStore, FastCache};
use crate::utils::constants::USERS_METRIC;

/// Resolves a property id to its weekly users count: fast cache, then durable store + analytics API.
///
/// There is no single-flight guard: concurrent misses for the same property each fetch and
/// write the same value, last writer wins.
#[derive(Clone)]
pub struct TieredCache {
    fast_cache: Arc<dyn FastCache>,
    store: Arc<dyn DurableStore>,
    fetcher: Arc<dyn MetricFetcher>,
    metric_ttl: Duration,
}

impl TieredCache {
    pub fn new(
        fast_cache: Arc<dyn FastCache>,
        store: Arc<dyn DurableStore>,
        fetcher: Arc<dyn MetricFetcher>,
        metric_ttl: Duration,
    ) -> Self {
        Self { fast_cache, store, fetcher, metric_ttl }
    }

    pub async fn resolve(&self, property_id: &str) -> Result<i64, ResolveError> {
        let metrics = get_metrics().await;
        let key = Property::cache_key(property_id);

        match self.fast_cache.get(&key).await {
            Ok(Some(bytes)) => {
                metrics.cache_lookups.with_label_values(&[CACHE_HIT]).inc();
                return parse_cached(&key, &bytes);
            }
            Ok(None) => {
                metrics.cache_lookups.with_label_values(&[CACHE_MISS]).inc();
            }
            Err(err) => {
                // unreadable cache is treated as a miss
                warn!("fast cache read '{}' failed: {:#}", key, err);
                metrics.cache_lookups.with_label_values(&[OUTCOME_ERROR]).inc();
            }
        }

        self.fetch_and_populate(property_id, &key).await
    }

    async fn fetch_and_populate(&self, property_id: &str, key: &str) -> Result<i64, ResolveError> {
        let metrics = get_metrics().await;

        let property = self
            .store
            .get_property(property_id)
            .await
            .map_err(ResolveError::Storage)?
            .ok_or_else(|| ResolveError::UnknownProperty(property_id.to_owned()))?;

        let mut account = self
            .store
            .get_account(&property.owner)
            .await
            .map_err(ResolveError::Storage)?
            .ok_or_else(|| ResolveError::UnknownAccount {
                username: property.owner.clone(),
                property_id: property_id.to_owned(),
            })?;
        let loaded = account.clone();

        let started = Instant::now();
        let fetched = self
            .fetcher
            .fetch_users(account.get_token(), &property.profile, &ReportWindow::trailing_week())
            .await;
        metrics.upstream_fetch_duration.observe(started.elapsed().as_secs_f64());
        let fetched = fetched.map_err(|err| {
            metrics.upstream_fetches.with_label_values(&[OUTCOME_ERROR]).inc();
            ResolveError::Upstream(err)
        })?;
        metrics.upstream_fetches.with_label_values(&[OUTCOME_OK]).inc();

        let raw = fetched.value.get(USERS_METRIC).cloned().unwrap_or_default();
        let total: i64 = raw.parse().map_err(|_| ResolveError::MalformedTotal {
            profile: property.profile.clone(),
            value: raw.clone(),
        })?;
        debug!("property '{}' resolved to {} weekly users", property_id, total);

        if let Err(err) = self
            .fast_cache
            .set(key, total.to_string().into_bytes(), self.metric_ttl)
            .await
        {
            warn!("fast cache write '{}' failed: {:#}", key, err);
            metrics.persistence_warnings.with_label_values(&[TARGET_CACHE]).inc();
        }

        if let Some(credential) = fetched.credential {
            account.set_token(credential);
        }
        if account != loaded {
            info!("credential of account '{}' changed, persisting", account.username);
            metrics.token_refreshes.inc();
            if let Err(err) = self.store.put_account(&account).await {
                warn!("persisting account '{}' failed: {:#}", account.username, err);
                metrics.persistence_warnings.with_label_values(&[TARGET_ACCOUNT]).inc();
            }
        }

        Ok(total)
    }
}

fn parse_cached(key: &str, bytes: &[u8]) -> Result<i64, ResolveError> {
    let value = String::from_utf8_lossy(bytes);
    value.parse::<i64>().map_err(|_| ResolveError::DataCorruption {
        key: key.to_owned(),
        value: value.into_owned(),
    })
}
