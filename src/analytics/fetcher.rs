use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::Credential;
use crate::oauth::Authorized;

/// Relative date range understood by the reporting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: &'static str,
    pub end: &'static str,
}

impl ReportWindow {
    /// Trailing seven days, ending yesterday.
    pub fn trailing_week() -> Self {
        Self { start: "7daysAgo", end: "yesterday" }
    }
}

/// Source of the weekly users total for an analytics profile.
#[async_trait]
pub trait MetricFetcher: Send + Sync {
    /// Returns the totals row (e.g. `{"ga:users": "1234"}`) and the possibly refreshed credential.
    async fn fetch_users(
        &self,
        credential: Option<Credential>,
        profile_ref: &str,
        window: &ReportWindow,
    ) -> Result<Authorized<HashMap<String, String>>>;
}
