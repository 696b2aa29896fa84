//! Web boundary: badge endpoint plus session-backed account linking.

pub mod badge;
pub mod index;
pub mod manage;
pub mod oauth;
pub mod session;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

/// Handler failure rendered as a plain 500 with the error text.
#[derive(Debug)]
pub struct WebError(pub anyhow::Error);

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("handler error: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", self.0)).into_response()
    }
}

impl<E> From<E> for WebError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
