use serde::Deserialize;

use crate::utils::constants::{DEFAULT_BADGE_MAX_AGE_SECS, DEFAULT_METRIC_TTL_SECS, DEFAULT_SESSION_TTL_SECS};

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub badge: BadgeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { path: default_metrics_path(), is_enabled: false }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String
}

/// TTLs of the fast cache entries.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// invariant: > 0. resolved metrics live this long under "b:<property id>"
    #[serde(default = "default_metric_ttl")]
    pub metric_ttl_seconds: u64,
    /// invariant: > 0. also used as the session cookie max-age
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            metric_ttl_seconds: default_metric_ttl(),
            session_ttl_seconds: default_session_ttl(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BadgeConfig {
    #[serde(default = "default_badge_max_age")]
    pub cache_control_max_age_seconds: u64,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self { cache_control_max_age_seconds: default_badge_max_age() }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level: level, format: format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_metric_ttl() -> u64 {
    DEFAULT_METRIC_TTL_SECS
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_badge_max_age() -> u64 {
    DEFAULT_BADGE_MAX_AGE_SECS
}
