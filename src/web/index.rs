use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use crate::server::server::AppState;
use crate::utils::markup::escape;
use crate::web::WebError;

/// Landing page with the consent link.
pub async fn index(State(state): State<AppState>) -> Result<Response, WebError> {
    let auth_url = state.oauth.authorization_url("")?;
    let page = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Analytics badge</title></head>
<body>
<h1>Weekly users badge</h1>
<p>Link your analytics account to publish a badge for your properties.</p>
<p><a href="{}">Sign in with Google Analytics</a></p>
</body>
</html>
"#,
        escape(auth_url.as_str())
    );
    Ok(Html(page).into_response())
}
