#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    use crate::domain::Credential;
    use crate::tests::common::{oauth_client, service_config};

    #[tokio::test]
    async fn fresh_credential_is_used_without_token_call() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(500);
            })
            .await;
        let client = oauth_client(&service_config(&server.base_url()));

        let fresh = Credential::new("access-1".into(), "refresh-1".into(), Some(Utc::now() + Duration::hours(1)));
        let used = client.authorize(Some(fresh.clone())).await.unwrap();

        assert_eq!(used, fresh);
        assert_eq!(token_mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn stale_credential_is_refreshed_and_keeps_refresh_token() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .form_urlencoded_tuple("grant_type", "refresh_token")
                    .form_urlencoded_tuple("refresh_token", "refresh-1")
                    .form_urlencoded_tuple("client_id", "test-client");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "access-2",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;
        let client = oauth_client(&service_config(&server.base_url()));

        let stale = Credential::new("access-1".into(), "refresh-1".into(), Some(Utc::now() - Duration::minutes(5)));
        let used = client.authorize(Some(stale)).await.unwrap();

        token_mock.assert_async().await;
        assert_eq!(used.access_token, "access-2");
        assert_eq!(used.refresh_token, "refresh-1");
        assert!(used.expires_at.unwrap() > Utc::now() + Duration::minutes(59));
    }

    #[tokio::test]
    async fn missing_credential_is_not_authorized() {
        let server = MockServer::start_async().await;
        let client = oauth_client(&service_config(&server.base_url()));

        let err = client.authorize(None).await.unwrap_err();
        assert!(err.to_string().contains("not authorized"));

        let expired = Credential::new("access-1".into(), String::new(), Some(Utc::now() - Duration::minutes(5)));
        assert!(client.authorize(Some(expired)).await.is_err());
    }

    #[tokio::test]
    async fn refresh_rejection_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(400).json_body(json!({"error": "invalid_grant"}));
            })
            .await;
        let client = oauth_client(&service_config(&server.base_url()));

        let stale = Credential::new("access-1".into(), "refresh-1".into(), Some(Utc::now() - Duration::minutes(5)));
        let err = client.authorize(Some(stale)).await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn code_exchange_returns_full_credential() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .form_urlencoded_tuple("grant_type", "authorization_code")
                    .form_urlencoded_tuple("code", "code-xyz")
                    .form_urlencoded_tuple("redirect_uri", "http://127.0.0.1/oauth");
                then.status(200).json_body(json!({
                    "access_token": "access-1",
                    "refresh_token": "refresh-1",
                    "expires_in": 3600
                }));
            })
            .await;
        let client = oauth_client(&service_config(&server.base_url()));

        let issued = client.exchange("code-xyz").await.unwrap();

        token_mock.assert_async().await;
        assert_eq!(issued.access_token, "access-1");
        assert_eq!(issued.refresh_token, "refresh-1");
        assert!(client.exchange("").await.is_err());
    }

    #[test]
    fn authorization_url_requests_offline_access() {
        let client = oauth_client(&service_config("http://auth.example"));

        let url = client.authorization_url("").unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/auth");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "test-client");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1/oauth");
        assert_eq!(params["scope"], "https://www.googleapis.com/auth/analytics.readonly");
    }
}
