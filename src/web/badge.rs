use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::StatusCode;
use tracing::{error, info};

use crate::badge::{render_svg, BadgeLayout};
use crate::error::ErrorKind;
use crate::observability::metrics::{get_metrics, OUTCOME_ERROR, OUTCOME_NOT_FOUND, OUTCOME_OK};
use crate::server::server::AppState;
use crate::utils::constants::BADGE_PATH_SUFFIX;

/// `GET /badge/{propertyId}.svg`. Failures are logged and answered without a body.
pub async fn badge(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    let metrics = get_metrics().await;

    let Some(property_id) = badge_property_id(&file) else {
        info!("badge path '{}' has no property id", file);
        metrics.badge_requests.with_label_values(&[OUTCOME_NOT_FOUND]).inc();
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.resolver.resolve(property_id).await {
        Ok(total) => {
            metrics.badge_requests.with_label_values(&[OUTCOME_OK]).inc();
            let layout = BadgeLayout::for_metric(total);
            let cache_control = format!(
                "public, max-age={}",
                state.settings.badge.cache_control_max_age_seconds
            );
            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, "image/svg+xml".to_string()),
                    (CACHE_CONTROL, cache_control),
                ],
                render_svg(&layout),
            )
                .into_response()
        }
        Err(err) => {
            error!("badge '{}' error: {}", property_id, err);
            let outcome = match err.kind() {
                ErrorKind::NotFound => OUTCOME_NOT_FOUND,
                _ => OUTCOME_ERROR,
            };
            metrics.badge_requests.with_label_values(&[outcome]).inc();
            StatusCode::from(err.kind()).into_response()
        }
    }
}

fn badge_property_id(file: &str) -> Option<&str> {
    file.strip_suffix(BADGE_PATH_SUFFIX).filter(|id| !id.is_empty())
}
