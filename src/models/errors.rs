//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so logs can be grepped by
//! category. Codes follow the pattern CATEGORY_SPECIFIC_ERROR:
//! - UPSTREAM_xxx: failures talking to a third-party API
//! - NEWS_xxx: news index rejected the query
//! - API_xxx: failures of our own HTTP surface
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message, shown to the user as-is
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Replace the user-facing message, keeping code and source.
    /// Adapters use this to turn a transport error into e.g. "Failed to fetch news".
    pub fn context(mut self, message: impl Into<String>) -> Self {
        let detail = self.message.clone();
        self.message = message.into();
        if self.source.is_none() && !detail.is_empty() {
            self.source = Some(Box::new(Detail(detail)));
        }
        self
    }

    /// Technical detail suitable for the envelope's `error` field
    pub fn detail(&self) -> Option<String> {
        self.source.as_ref().map(|e| e.to_string())
    }

    /// HTTP status for this error
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Plain-text detail kept when a message is replaced
#[derive(Debug)]
struct Detail(String);

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Detail {}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Upstream Errors
    // ============================================
    /// Connection to upstream failed
    UpstreamUnreachable,
    /// Upstream did not answer in time
    UpstreamTimeout,
    /// Upstream answered with a non-success HTTP status
    UpstreamStatus,
    /// Upstream answered successfully but with no records
    UpstreamEmpty,
    /// Upstream body could not be parsed
    UpstreamInvalidResponse,

    // ============================================
    // News Errors
    // ============================================
    /// News index reported `status != "ok"`
    NewsUnavailable,

    // ============================================
    // API Errors
    // ============================================
    /// A profile aggregation is already running
    AggregationInProgress,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing API key
    ConfigMissingApiKey,
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamUnreachable => "UPSTREAM_UNREACHABLE",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamStatus => "UPSTREAM_STATUS",
            Self::UpstreamEmpty => "UPSTREAM_EMPTY",
            Self::UpstreamInvalidResponse => "UPSTREAM_INVALID_RESPONSE",
            Self::NewsUnavailable => "NEWS_UNAVAILABLE",
            Self::AggregationInProgress => "API_AGGREGATION_IN_PROGRESS",
            Self::ConfigMissingApiKey => "CFG_MISSING_API_KEY",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ConfigInvalidValue => 400,
            Self::UpstreamStatus | Self::UpstreamEmpty => 404,
            Self::AggregationInProgress => 409,
            // Reported in-band: the envelope says success=false
            Self::NewsUnavailable => 200,
            _ => 500,
        }
    }

    /// Whether this is a local configuration problem rather than an upstream one
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigMissingApiKey | Self::ConfigInvalidValue)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Upstream answered with a non-success status
    pub fn upstream_status(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamStatus, msg)
    }

    /// Upstream answered with nothing usable
    pub fn upstream_empty(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamEmpty, msg)
    }

    /// News index rejected the query
    pub fn news_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NewsUnavailable, msg)
    }

    /// Missing API key
    pub fn missing_api_key(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissingApiKey, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::UpstreamTimeout
        } else if err.is_connect() {
            ErrorCode::UpstreamUnreachable
        } else if err.is_decode() {
            ErrorCode::UpstreamInvalidResponse
        } else if err.is_status() {
            ErrorCode::UpstreamStatus
        } else {
            ErrorCode::Unknown
        };
        Self::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::UpstreamInvalidResponse, "JSON parse error", err)
    }
}
