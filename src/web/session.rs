use std::time::Duration;

use anyhow::{anyhow, Result};
use axum::response::Response;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::Account;
use crate::observability::metrics::{get_metrics, TARGET_ACCOUNT, TARGET_SESSION};
use crate::server::server::AppState;
use crate::utils::constants::{SESSION_COOKIE, SESSION_KEY_PREFIX};

/// Request-scoped session: cookie id plus the linked account, written back when it changed.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub account: Account,
    loaded: Account,
    issued: bool,
}

impl Session {
    /// Reuse the `session` cookie or mint a new id; a known id loads its account from the store.
    pub async fn load(state: &AppState, headers: &HeaderMap) -> Result<Self> {
        let Some(id) = session_cookie(headers) else {
            let id = Uuid::new_v4().simple().to_string();
            debug!("issuing session '{}'", id);
            return Ok(Self { id, account: Account::default(), loaded: Account::default(), issued: true });
        };

        let mut account = Account::default();
        match state.fast_cache.get(&session_key(&id)).await {
            Ok(Some(username)) => {
                let username = String::from_utf8_lossy(&username).into_owned();
                account = state
                    .store
                    .get_account(&username)
                    .await?
                    .ok_or_else(|| anyhow!("session '{}' references unknown account '{}'", id, username))?;
            }
            Ok(None) => {}
            Err(err) => warn!("session lookup '{}' failed: {:#}", id, err),
        }

        Ok(Self { id, loaded: account.clone(), account, issued: false })
    }

    /// Persist a changed account (session entry + durable record) and attach the cookie of a new session.
    pub async fn finish(&self, state: &AppState, mut response: Response) -> Response {
        if self.account != self.loaded {
            self.save(state).await;
        }
        if self.issued {
            let max_age = state.settings.cache.session_ttl_seconds;
            let cookie = format!("{}={}; Max-Age={}; Path=/; HttpOnly", SESSION_COOKIE, self.id, max_age);
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(err) => error!("invalid session cookie: {}", err),
            }
        }
        response
    }

    async fn save(&self, state: &AppState) {
        let metrics = get_metrics().await;
        if self.account.username.is_empty() {
            warn!("session '{}' has an account without username, not persisted", self.id);
            return;
        }

        let ttl = Duration::from_secs(state.settings.cache.session_ttl_seconds);
        if let Err(err) = state
            .fast_cache
            .set(&session_key(&self.id), self.account.username.clone().into_bytes(), ttl)
            .await
        {
            error!("session write '{}' failed: {:#}", self.id, err);
            metrics.persistence_warnings.with_label_values(&[TARGET_SESSION]).inc();
        }
        if let Err(err) = state.store.put_account(&self.account).await {
            error!("account write '{}' failed: {:#}", self.account.username, err);
            metrics.persistence_warnings.with_label_values(&[TARGET_ACCOUNT]).inc();
        }
    }
}

pub fn session_key(id: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, id)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
