use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::utils::constants::{DEFAULT_AUTH_URI, DEFAULT_OAUTH_SCOPE, DEFAULT_REFRESH_MARGIN_SECS, DEFAULT_TOKEN_URI};

/// ================================
/// OAuth2 client registration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthConfig {
    /// Downloaded `client_secrets.json`; fills every field left empty below.
    pub client_secrets_file: Option<String>,
    #[serde(default)]
    pub auth_uri: String,
    #[serde(default)]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// access tokens expiring within this margin are refreshed before use
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_seconds: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_secrets_file: None,
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            scope: default_scope(),
            refresh_margin_seconds: default_refresh_margin(),
        }
    }
}

/// `client_secrets.json` as issued by the provider console.
#[derive(Debug, Deserialize)]
pub struct ClientSecrets {
    pub web: WebClientSecrets,
}

#[derive(Debug, Deserialize)]
pub struct WebClientSecrets {
    pub auth_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    pub token_uri: String,
}

impl OAuthConfig {
    /// Merge the client secrets file (if configured) and fall back to the provider defaults.
    pub async fn resolve(mut self, base_dir: Option<&Path>) -> Result<Self> {
        if let Some(file) = self.client_secrets_file.clone() {
            let path = match base_dir {
                Some(dir) if Path::new(&file).is_relative() => dir.join(&file),
                _ => Path::new(&file).to_path_buf(),
            };
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("read client secrets '{}'", path.display()))?;
            let secrets: ClientSecrets = serde_json::from_str(&content)
                .with_context(|| format!("parse client secrets '{}'", path.display()))?;
            self.apply_client_secrets(secrets)?;
        }
        if self.auth_uri.is_empty() {
            self.auth_uri = DEFAULT_AUTH_URI.to_string();
        }
        if self.token_uri.is_empty() {
            self.token_uri = DEFAULT_TOKEN_URI.to_string();
        }
        Ok(self)
    }

    fn apply_client_secrets(&mut self, secrets: ClientSecrets) -> Result<()> {
        let web = secrets.web;
        fill(&mut self.auth_uri, web.auth_uri);
        fill(&mut self.token_uri, web.token_uri);
        fill(&mut self.client_id, web.client_id);
        fill(&mut self.client_secret, web.client_secret);
        if self.redirect_uri.is_empty() {
            self.redirect_uri = web
                .redirect_uris
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("client secrets define no redirect_uris"))?;
        }
        Ok(())
    }
}

fn fill(target: &mut String, value: String) {
    if target.is_empty() {
        *target = value;
    }
}

fn default_scope() -> String {
    DEFAULT_OAUTH_SCOPE.to_string()
}

fn default_refresh_margin() -> u64 {
    DEFAULT_REFRESH_MARGIN_SECS
}
