use serde::{Deserialize, Serialize};

use crate::utils::constants::METRIC_KEY_PREFIX;

/// Registered analytics property, keyed by its public badge id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    /// Username of the owning account (back-reference only).
    pub owner: String,
    /// Analytics profile (view) id queried for the metric.
    pub profile: String,
}

impl Property {
    pub fn new(id: impl Into<String>, owner: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            profile: profile.into(),
        }
    }

    pub fn cache_key(property_id: &str) -> String {
        format!("{}{}", METRIC_KEY_PREFIX, property_id)
    }
}
