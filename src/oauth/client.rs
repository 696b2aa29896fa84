use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use reqwest::{Client, Url};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::oauth::OAuthConfig;
use crate::domain::Credential;
use crate::oauth::token::TokenResponse;

/// Delegated-authorization client: exchanges codes and keeps credentials usable.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    config: Arc<OAuthConfig>,
}

impl OAuthClient {
    pub fn new(http: Client, config: OAuthConfig) -> Self {
        Self { http, config: Arc::new(config) }
    }

    /// Consent page URL requesting offline access, so the first grant carries a refresh token.
    pub fn authorization_url(&self, state: &str) -> Result<Url> {
        let cfg = &self.config;
        let url = Url::parse_with_params(
            &cfg.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", cfg.client_id.as_str()),
                ("redirect_uri", cfg.redirect_uri.as_str()),
                ("scope", cfg.scope.as_str()),
                ("access_type", "offline"),
                ("state", state),
            ],
        )?;
        Ok(url)
    }

    /// exchange(code) -> credential
    pub async fn exchange(&self, code: &str) -> Result<Credential> {
        if code.is_empty() {
            bail!("authorization code is empty");
        }
        let cfg = &self.config;
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
        ];
        let credential = self.token_request(&form).await?;
        info!("authorization code exchanged");
        Ok(credential)
    }

    /// The returned credential carries an empty refresh token unless the issuer rotated it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Credential> {
        let cfg = &self.config;
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.as_str()),
        ];
        let credential = self.token_request(&form).await?;
        info!("access token refreshed");
        Ok(credential)
    }

    /// Credential to use for the next request, refreshed when stale.
    pub async fn authorize(&self, credential: Option<Credential>) -> Result<Credential> {
        let margin = self.config.refresh_margin_seconds;
        match credential {
            Some(credential) if credential.is_fresh(Utc::now(), margin) => {
                debug!("access token still fresh");
                Ok(credential)
            }
            Some(credential) if !credential.refresh_token.is_empty() => {
                let mut refreshed = self.refresh(&credential.refresh_token).await?;
                if refreshed.refresh_token.is_empty() {
                    refreshed.refresh_token = credential.refresh_token;
                }
                Ok(refreshed)
            }
            Some(_) => Err(anyhow!("access token expired and no refresh token is available")),
            None => Err(anyhow!("account is not authorized")),
        }
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<Credential> {
        let response = self.http.post(&self.config.token_uri).form(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("token request failed: {} {}", status, body);
        }
        let token: TokenResponse = response.json().await?;
        if token.access_token.is_empty() {
            bail!("token response carries no access_token");
        }
        Ok(token.into_credential())
    }
}
