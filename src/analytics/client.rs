use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::collections::HashMap;
use tracing::debug;

use crate::analytics::fetcher::{MetricFetcher, ReportWindow};
use crate::analytics::models::{AccountSummaries, GaData};
use crate::config::types::AnalyticsConfig;
use crate::domain::Credential;
use crate::oauth::{Authorized, OAuthClient};
use crate::utils::constants::{PROFILE_ID_PREFIX, USERS_METRIC};

/// Analytics API client authenticated through the delegated OAuth client.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: Client,
    oauth: OAuthClient,
    config: AnalyticsConfig,
}

impl AnalyticsClient {
    pub fn new(http: Client, oauth: OAuthClient, config: AnalyticsConfig) -> Self {
        Self { http, oauth, config }
    }

    pub async fn totals(
        &self,
        credential: Option<Credential>,
        profile_ref: &str,
        window: &ReportWindow,
        metrics: &str,
    ) -> Result<Authorized<HashMap<String, String>>> {
        let credential = self.oauth.authorize(credential).await?;
        debug!("querying totals for profile '{}' ({} .. {})", profile_ref, window.start, window.end);

        let response = self
            .http
            .get(&self.config.data_url)
            .bearer_auth(&credential.access_token)
            .query(&[
                ("ids", format!("{}{}", PROFILE_ID_PREFIX, profile_ref)),
                ("start-date", window.start.to_string()),
                ("end-date", window.end.to_string()),
                ("metrics", metrics.to_string()),
            ])
            .send()
            .await?;
        let data: GaData = ensure_success(response, "analytics data").await?.json().await?;

        Ok(Authorized::new(data.totals_for_all_results, Some(credential)))
    }

    pub async fn account_summaries(&self, credential: Option<Credential>) -> Result<Authorized<AccountSummaries>> {
        let credential = self.oauth.authorize(credential).await?;
        let url = format!("{}/accountSummaries", self.config.management_url.trim_end_matches('/'));

        let response = self.http.get(&url).bearer_auth(&credential.access_token).send().await?;
        let summaries: AccountSummaries = ensure_success(response, "account summaries").await?.json().await?;

        Ok(Authorized::new(summaries, Some(credential)))
    }
}

#[async_trait]
impl MetricFetcher for AnalyticsClient {
    async fn fetch_users(
        &self,
        credential: Option<Credential>,
        profile_ref: &str,
        window: &ReportWindow,
    ) -> Result<Authorized<HashMap<String, String>>> {
        self.totals(credential, profile_ref, window, USERS_METRIC).await
    }
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("{} request failed: {} {}", what, status, body);
    }
    Ok(response)
}
