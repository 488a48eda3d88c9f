use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
// Keep this alphabetized.
pub enum ErrorCode {
    BadJson,
    InvalidArgument,
    LimitExceeded,
    Other,
    ResourceInUse,
    ResourceNotFound,
    Throttled,
    Unavailable,
}

impl ErrorCode {
    pub fn status(self) -> http::StatusCode {
        match self {
            Self::BadJson | Self::InvalidArgument => http::StatusCode::BAD_REQUEST,
            Self::LimitExceeded | Self::ResourceInUse => http::StatusCode::CONFLICT,
            Self::ResourceNotFound => http::StatusCode::NOT_FOUND,
            Self::Throttled => http::StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable => http::StatusCode::SERVICE_UNAVAILABLE,
            Self::Other => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the same request may succeed if sent again later.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Throttled | Self::Unavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
