use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Result;
use axum::extract::{Form, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use http::HeaderMap;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::analytics::models::{AccountSummaries, AccountSummary};
use crate::domain::{Credential, Property};
use crate::observability::metrics::{get_metrics, TARGET_CACHE, TARGET_PROPERTY};
use crate::server::server::AppState;
use crate::web::session::Session;
use crate::web::WebError;

/// Property picker data: what the user can register and what is registered already.
#[derive(Debug, Serialize)]
pub struct ManageView {
    pub username: String,
    pub accounts: Vec<AccountSummary>,
    /// property id -> registered profile id
    pub profiles: BTreeMap<String, String>,
}

/// `GET /manage`
pub async fn manage(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (mut session, credential) = match authenticated_session(&state, &headers).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    match manage_view(&state, &mut session, credential).await {
        Ok(view) => session.finish(&state, Json(view).into_response()).await,
        Err(err) => WebError(err).into_response(),
    }
}

/// `POST /manage` with form fields `<web property id>=<profile id>`.
pub async fn register_properties(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let (mut session, credential) = match authenticated_session(&state, &headers).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    match register(&state, &mut session, credential, form).await {
        Ok(()) => session.finish(&state, Redirect::to("/manage").into_response()).await,
        Err(err) => WebError(err).into_response(),
    }
}

/// Unauthenticated or broken sessions are sent back to the landing page.
async fn authenticated_session(state: &AppState, headers: &HeaderMap) -> Result<(Session, Credential), Response> {
    let session = Session::load(state, headers).await.map_err(|err| {
        error!("session load failed: {:#}", err);
        Redirect::to("/").into_response()
    })?;
    match session.account.get_token() {
        Some(credential) => Ok((session, credential)),
        None => Err(session.finish(state, Redirect::to("/").into_response()).await),
    }
}

async fn list_summaries(state: &AppState, session: &mut Session, credential: Credential) -> Result<AccountSummaries> {
    let summaries = state.analytics.account_summaries(Some(credential)).await?;
    if let Some(credential) = summaries.credential {
        session.account.set_token(credential);
    }
    Ok(summaries.value)
}

async fn manage_view(state: &AppState, session: &mut Session, credential: Credential) -> Result<ManageView> {
    let summaries = list_summaries(state, session, credential).await?;
    let profiles = state
        .store
        .properties_by_owner(&session.account.username)
        .await?
        .into_iter()
        .map(|property| (property.id, property.profile))
        .collect();

    Ok(ManageView {
        username: session.account.username.clone(),
        accounts: summaries.items,
        profiles,
    })
}

async fn register(
    state: &AppState,
    session: &mut Session,
    credential: Credential,
    form: HashMap<String, String>,
) -> Result<()> {
    let metrics = get_metrics().await;
    let summaries = list_summaries(state, session, credential).await?;
    let visible: HashSet<&str> = summaries.web_property_ids().collect();

    let mut properties = Vec::new();
    for (id, profile) in form {
        if !visible.contains(id.as_str()) {
            warn!("'{}' tried to register foreign property '{}'", session.account.username, id);
            continue;
        }
        properties.push(Property::new(id, session.account.username.clone(), profile));
    }
    if properties.is_empty() {
        return Ok(());
    }

    if let Err(err) = state.store.put_properties(&properties).await {
        error!("registering properties failed: {:#}", err);
        metrics.persistence_warnings.with_label_values(&[TARGET_PROPERTY]).inc();
    }
    let keys: Vec<String> = properties.iter().map(|property| Property::cache_key(&property.id)).collect();
    if let Err(err) = state.fast_cache.delete_multi(&keys).await {
        error!("invalidating cached badges failed: {:#}", err);
        metrics.persistence_warnings.with_label_values(&[TARGET_CACHE]).inc();
    }
    info!("'{}' registered {} properties", session.account.username, properties.len());
    Ok(())
}
