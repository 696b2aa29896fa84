//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - server address, metrics route, cache TTLs
//! - oauth client registration and analytics endpoints

use reqwest::Url;
use tracing::{error, info};

use crate::config::oauth::OAuthConfig;
use crate::config::settings::SettingsConfig;
use crate::config::types::{AnalyticsConfig, ServiceConfig};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::MAX_REFRESH_MARGIN_SECS;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_analytics(&cfg.analytics, &mut errors);
    validate_oauth(&cfg.oauth, &mut errors);

    if let Some(path) = &cfg.storage.path {
        if path.trim().is_empty() {
            errors.push("storage.path must not be empty when set".to_string());
        }
    }

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc();
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be a valid port number",
            settings.server.port
        ));
    }

    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }

    if settings.cache.metric_ttl_seconds == 0 {
        errors.push("settings.cache.metric_ttl_seconds must be > 0".to_string());
    }
    if settings.cache.session_ttl_seconds == 0 {
        errors.push("settings.cache.session_ttl_seconds must be > 0".to_string());
    }

    if let Some(logging) = &settings.logging {
        if !matches!(
            logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            errors.push(format!("settings.logging.level '{}' is not supported", logging.level));
        }
    }
}

fn validate_analytics(analytics: &AnalyticsConfig, errors: &mut Vec<String>) {
    validate_url("analytics.data_url", &analytics.data_url, errors);
    validate_url("analytics.management_url", &analytics.management_url, errors);
}

fn validate_oauth(oauth: &OAuthConfig, errors: &mut Vec<String>) {
    if oauth.client_id.is_empty() {
        errors.push("oauth.client_id is required (inline or via client_secrets_file)".to_string());
    }
    validate_url("oauth.auth_uri", &oauth.auth_uri, errors);
    validate_url("oauth.token_uri", &oauth.token_uri, errors);
    if !oauth.redirect_uri.is_empty() {
        validate_url("oauth.redirect_uri", &oauth.redirect_uri, errors);
    }
    if oauth.scope.trim().is_empty() {
        errors.push("oauth.scope must not be empty".to_string());
    }
    if oauth.refresh_margin_seconds > MAX_REFRESH_MARGIN_SECS {
        errors.push(format!(
            "oauth.refresh_margin_seconds {} must be <= {}",
            oauth.refresh_margin_seconds, MAX_REFRESH_MARGIN_SECS
        ));
    }
}

fn validate_url(field: &str, value: &str, errors: &mut Vec<String>) {
    if Url::parse(value).is_err() {
        errors.push(format!("{} '{}' is not a valid absolute URL", field, value));
    }
}
