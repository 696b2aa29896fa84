use serde::Deserialize;

use crate::config::oauth::OAuthConfig;
use crate::config::settings::SettingsConfig;
use crate::utils::constants::{DEFAULT_ANALYTICS_DATA_URL, DEFAULT_ANALYTICS_MANAGEMENT_URL};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// ================================
/// Analytics API endpoints
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Core reporting endpoint (`/data/ga`).
    #[serde(default = "default_data_url")]
    pub data_url: String,
    /// Management API root, `accountSummaries` lives below it.
    #[serde(default = "default_management_url")]
    pub management_url: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            data_url: default_data_url(),
            management_url: default_management_url(),
        }
    }
}

/// ================================
/// Durable storage
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// JSON snapshot file; records are kept in memory only when absent.
    pub path: Option<String>,
}

fn default_data_url() -> String {
    DEFAULT_ANALYTICS_DATA_URL.to_string()
}

fn default_management_url() -> String {
    DEFAULT_ANALYTICS_MANAGEMENT_URL.to_string()
}
