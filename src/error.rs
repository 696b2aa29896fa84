use http::StatusCode;
use thiserror::Error;

/// Terminal failures of metric resolution. None of them produce a badge.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown badge '{0}'")]
    UnknownProperty(String),

    #[error("account '{username}' referenced by property '{property_id}' not found")]
    UnknownAccount { username: String, property_id: String },

    #[error("cached metric under '{key}' is not an integer: {value:?}")]
    DataCorruption { key: String, value: String },

    #[error("metric fetch failed: {0:#}")]
    Upstream(anyhow::Error),

    #[error("analytics total for profile '{profile}' is not an integer: {value:?}")]
    MalformedTotal { profile: String, value: String },

    #[error("durable store read failed: {0:#}")]
    Storage(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DataCorruption,
    UpstreamFailure,
    Storage,
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::UnknownProperty(_) | ResolveError::UnknownAccount { .. } => ErrorKind::NotFound,
            ResolveError::DataCorruption { .. } => ErrorKind::DataCorruption,
            ResolveError::Upstream(_) | ResolveError::MalformedTotal { .. } => ErrorKind::UpstreamFailure,
            ResolveError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<ErrorKind> for StatusCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::UpstreamFailure => StatusCode::BAD_GATEWAY,
            ErrorKind::DataCorruption | ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
