#[cfg(test)]
mod test {
    use std::sync::Arc;

    use http::StatusCode;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::{json, Value};

    use crate::server::server::router;
    use crate::store::{DurableStore, FastCache, MemoryDurableStore, MemoryFastCache};
    use crate::tests::common::{app_state, build_reqwest_client, service_config, spawn_axum, ScriptedFetcher};

    struct Linked {
        upstream: MockServer,
        base: String,
        cookie: String,
        fast_cache: Arc<MemoryFastCache>,
        store: Arc<MemoryDurableStore>,
    }

    async fn mock_upstream(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token").form_urlencoded_tuple("code", "code-1");
                then.status(200).json_body(json!({
                    "access_token": "access-1",
                    "refresh_token": "refresh-1",
                    "expires_in": 3600
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/analytics/v3/management/accountSummaries");
                then.status(200).json_body(json!({
                    "username": "alice@example.com",
                    "items": [{
                        "id": "1000",
                        "name": "Alice",
                        "webProperties": [
                            {"id": "UA-1000-1", "name": "blog", "profiles": [{"id": "123", "name": "All"}]}
                        ]
                    }]
                }));
            })
            .await;
    }

    async fn link() -> Linked {
        let upstream = MockServer::start_async().await;
        mock_upstream(&upstream).await;

        let config = service_config(&upstream.base_url());
        let fast_cache = Arc::new(MemoryFastCache::new());
        let store = Arc::new(MemoryDurableStore::new());
        let state = app_state(&config, fast_cache.clone(), store.clone(), Arc::new(ScriptedFetcher::total("0"))).await;
        let (_handle, addr) = spawn_axum(router(state)).await;
        let base = format!("http://{}", addr);

        let response = build_reqwest_client()
            .get(format!("{}/oauth?code=code-1", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/manage");
        let set_cookie = response.headers()["set-cookie"].to_str().unwrap().to_string();
        assert!(set_cookie.contains("Max-Age=3600"));
        let cookie = set_cookie.split(';').next().unwrap().to_string();

        Linked { upstream, base, cookie, fast_cache, store }
    }

    #[tokio::test]
    async fn oauth_callback_links_account_to_session() {
        let linked = link().await;

        let account = linked.store.get_account("alice@example.com").await.unwrap().unwrap();
        assert_eq!(account.credential.access_token, "access-1");
        assert_eq!(account.credential.refresh_token, "refresh-1");

        let session_id = linked.cookie.trim_start_matches("session=");
        let stored = linked.fast_cache.get(&format!("s:{}", session_id)).await.unwrap();
        assert_eq!(stored, Some(b"alice@example.com".to_vec()));
    }

    #[tokio::test]
    async fn manage_lists_properties_for_linked_session() {
        let linked = link().await;

        let response = build_reqwest_client()
            .get(format!("{}/manage", linked.base))
            .header("Cookie", &linked.cookie)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("set-cookie").is_none());
        let view: Value = response.json().await.unwrap();
        assert_eq!(view["username"], "alice@example.com");
        assert_eq!(view["accounts"][0]["webProperties"][0]["id"], "UA-1000-1");
        assert_eq!(view["profiles"], json!({}));
    }

    #[tokio::test]
    async fn registering_properties_only_accepts_visible_ones() {
        let linked = link().await;
        linked
            .fast_cache
            .set("b:UA-1000-1", b"5".to_vec(), std::time::Duration::from_secs(60))
            .await
            .unwrap();

        let response = build_reqwest_client()
            .post(format!("{}/manage", linked.base))
            .header("Cookie", &linked.cookie)
            .form(&[("UA-1000-1", "123"), ("UA-9999-1", "555")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/manage");

        let property = linked.store.get_property("UA-1000-1").await.unwrap().unwrap();
        assert_eq!(property.owner, "alice@example.com");
        assert_eq!(property.profile, "123");
        assert!(linked.store.get_property("UA-9999-1").await.unwrap().is_none());
        assert_eq!(linked.fast_cache.get("b:UA-1000-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn manage_without_session_redirects_home() {
        let linked = link().await;

        let response = build_reqwest_client()
            .get(format!("{}/manage", linked.base))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/");
    }

    #[tokio::test]
    async fn index_links_to_consent_page() {
        let linked = link().await;

        let response = build_reqwest_client().get(format!("{}/", linked.base)).send().await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = response.text().await.unwrap();
        assert!(page.contains(&format!("{}/auth?", linked.upstream.base_url())));
        assert!(page.contains("access_type=offline"));
    }
}
