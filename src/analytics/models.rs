use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Core reporting response; only the totals row is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaData {
    #[serde(default)]
    pub totals_for_all_results: HashMap<String, String>,
}

/// `management/accountSummaries` listing for the signed-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummaries {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub items: Vec<AccountSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub web_properties: Vec<WebPropertySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPropertySummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profiles: Vec<ProfileSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl AccountSummaries {
    /// Web property ids visible to the user; registrations outside this set are rejected.
    pub fn web_property_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .flat_map(|account| account.web_properties.iter())
            .map(|property| property.id.as_str())
    }
}
