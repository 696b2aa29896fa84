use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Delegated-authorization credential held on behalf of an analytics user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// `None` means the issuer did not report an expiry; such a token never reads as stale.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(access_token: String, refresh_token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { access_token, refresh_token, expires_at }
    }

    /// Usable without a refresh: non-empty access token that outlives `now + margin`.
    pub fn is_fresh(&self, now: DateTime<Utc>, margin_seconds: u64) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        let Some(expires_at) = self.expires_at else {
            return true;
        };
        // a margin past the representable range leaves nothing fresh
        i64::try_from(margin_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|margin| now.checked_add_signed(margin))
            .is_some_and(|deadline| deadline < expires_at)
    }
}

/// Linked analytics user, keyed by username in the durable store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(default)]
    pub credential: Credential,
}

impl Account {
    pub fn new(username: impl Into<String>, credential: Credential) -> Self {
        Self { username: username.into(), credential }
    }

    /// Credential to hand to a delegated client; `None` until the account is authorized.
    pub fn get_token(&self) -> Option<Credential> {
        if self.credential.access_token.is_empty() {
            return None;
        }
        Some(self.credential.clone())
    }

    /// Refresh tokens are only issued on the initial grant, so an empty one never clobbers the stored value.
    pub fn set_token(&mut self, token: Credential) {
        self.credential.access_token = token.access_token;
        if !token.refresh_token.is_empty() {
            self.credential.refresh_token = token.refresh_token;
        }
        self.credential.expires_at = token.expires_at;
    }
}
