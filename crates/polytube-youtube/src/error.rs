use thiserror::Error;

/// Closed classification of platform API failures.
///
/// Derived from the HTTP status plus the first `reason` in the platform's
/// error envelope (`{"error": {"errors": [{"reason": "..."}]}}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 403 with a quota reason. Halts the remaining discovery run.
    QuotaExceeded,
    /// 429, or a per-user rate-limit reason.
    RateLimited,
    /// 403 for any other reason (bad key, disabled API, ...).
    Forbidden,
    NotFound,
    /// Comment threads are disabled for the requested video.
    CommentsDisabled,
    BadRequest,
    Other,
}

const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded", "dailyLimitExceededUnreg"];
const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

impl ApiErrorKind {
    /// Classify a failed response by status code and envelope reason.
    #[must_use]
    pub fn classify(status: u16, reason: Option<&str>) -> Self {
        let reason = reason.unwrap_or_default();
        match status {
            403 if QUOTA_REASONS.contains(&reason) => Self::QuotaExceeded,
            403 if reason == "commentsDisabled" => Self::CommentsDisabled,
            429 => Self::RateLimited,
            403 if RATE_LIMIT_REASONS.contains(&reason) => Self::RateLimited,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 => Self::BadRequest,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ApiErrorKind::QuotaExceeded => "quota exceeded",
            ApiErrorKind::RateLimited => "rate limited",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::CommentsDisabled => "comments disabled",
            ApiErrorKind::BadRequest => "bad request",
            ApiErrorKind::Other => "api error",
        };
        f.write_str(label)
    }
}

/// Errors returned by the platform API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-2xx status.
    #[error("{kind} (HTTP {status}): {message}")]
    Api {
        status: u16,
        kind: ApiErrorKind,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The statistics endpoint returned no item for the requested id.
    #[error("video {0} not found")]
    VideoNotFound(String),

    /// A field was present but malformed (non-numeric count, bad timestamp).
    #[error("invalid {field} for video {video_id}: '{value}'")]
    InvalidField {
        video_id: String,
        field: &'static str,
        value: String,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("pagination limit reached for {context}: exceeded {max_pages} pages")]
    PaginationLimit { context: String, max_pages: usize },
}

impl YoutubeError {
    /// The API failure class, if this error came from a non-2xx response.
    #[must_use]
    pub fn kind(&self) -> Option<&ApiErrorKind> {
        match self {
            YoutubeError::Api { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Whether the credential's quota is exhausted.
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self.kind(), Some(ApiErrorKind::QuotaExceeded))
    }
}
