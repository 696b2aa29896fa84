//! Shared constants and invariants

/// Fast cache key prefix for resolved weekly metrics.
pub const METRIC_KEY_PREFIX: &str = "b:";
/// Fast cache key prefix for session -> username entries.
pub const SESSION_KEY_PREFIX: &str = "s:";

pub const DEFAULT_METRIC_TTL_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_BADGE_MAX_AGE_SECS: u64 = 60 * 60;
pub const DEFAULT_REFRESH_MARGIN_SECS: u64 = 60;
pub const MAX_REFRESH_MARGIN_SECS: u64 = 24 * 60 * 60;

pub const USERS_METRIC: &str = "ga:users";
pub const PROFILE_ID_PREFIX: &str = "ga:";

pub const BADGE_PATH_SUFFIX: &str = ".svg";
pub const SESSION_COOKIE: &str = "session";

pub const DEFAULT_ANALYTICS_DATA_URL: &str = "https://www.googleapis.com/analytics/v3/data/ga";
pub const DEFAULT_ANALYTICS_MANAGEMENT_URL: &str = "https://www.googleapis.com/analytics/v3/management";
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";
