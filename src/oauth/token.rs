use serde::Deserialize;

use crate::domain::Credential;
use crate::helpers::time::expires_at_from_now;

/// Token endpoint response for both the code exchange and refresh grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Only present on the initial grant.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    pub fn into_credential(self) -> Credential {
        Credential::new(
            self.access_token,
            self.refresh_token.unwrap_or_default(),
            self.expires_in.and_then(expires_at_from_now),
        )
    }
}

/// Result of a delegated call: the payload plus the credential the client ended up holding.
#[derive(Debug, Clone)]
pub struct Authorized<T> {
    pub value: T,
    /// `None` when the call did not touch a credential.
    pub credential: Option<Credential>,
}

impl<T> Authorized<T> {
    pub fn new(value: T, credential: Option<Credential>) -> Self {
        Self { value, credential }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_expires_in_means_no_expiry() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":9000000000000000}"#).unwrap();

        let credential = token.into_credential();

        assert_eq!(credential.access_token, "a");
        assert_eq!(credential.refresh_token, "");
        assert_eq!(credential.expires_at, None);
    }

    #[test]
    fn expires_in_becomes_absolute_expiry() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r","expires_in":3600,"token_type":"Bearer"}"#)
                .unwrap();

        let credential = token.into_credential();

        assert_eq!(credential.refresh_token, "r");
        assert!(credential.expires_at.is_some());
    }
}
