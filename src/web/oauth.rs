use anyhow::{bail, Result};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use http::HeaderMap;
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Account;
use crate::server::server::AppState;
use crate::web::session::Session;
use crate::web::WebError;

#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    #[serde(default)]
    pub code: String,
}

/// `GET /oauth?code=...`: exchange the code, identify the user, link the account to the session.
pub async fn oauth_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<OAuthCallback>,
) -> Response {
    let mut session = match Session::load(&state, &headers).await {
        Ok(session) => session,
        Err(err) => {
            error!("session load failed: {:#}", err);
            return Redirect::to("/").into_response();
        }
    };

    if let Err(err) = link_account(&state, &mut session, &params.code).await {
        return WebError(err).into_response();
    }
    session.finish(&state, Redirect::to("/manage").into_response()).await
}

async fn link_account(state: &AppState, session: &mut Session, code: &str) -> Result<()> {
    let credential = state.oauth.exchange(code).await?;
    let summaries = state.analytics.account_summaries(Some(credential.clone())).await?;
    if summaries.value.username.is_empty() {
        bail!("account summaries carry no username");
    }

    let username = summaries.value.username;
    if session.account.username != username {
        // keep the refresh token of a previously linked record, consent may not reissue it
        session.account = state
            .store
            .get_account(&username)
            .await?
            .unwrap_or_else(|| Account::new(username.clone(), Default::default()));
    }
    session.account.set_token(summaries.credential.unwrap_or(credential));
    info!("account '{}' linked to session '{}'", session.account.username, session.id);
    Ok(())
}
