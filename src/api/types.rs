//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};

/// Uniform result envelope returned by every adapter-facing boundary.
///
/// On success `data` is set; on failure `message` is set. The news route
/// additionally fills `data` with an empty list on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Underlying technical error, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Failure that still hands the caller a usable value
    pub fn failure_with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(err.message.clone()),
            error: err.detail(),
        }
    }

    /// Error envelope that still carries `data`
    pub fn from_error_with_data(err: &AppError, data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::from_error(err)
        }
    }

    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_error(&err),
        }
    }

    /// `Some(data)` only for a successful envelope
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }

    /// Message to show for a failed envelope
    pub fn failure_message(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Health check payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub news_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(Envelope::success(42)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_failure_shape() {
        let json = serde_json::to_value(Envelope::<u32>::failure("Country not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Country not found"})
        );
    }

    #[test]
    fn test_failure_with_data_keeps_list() {
        let env = Envelope::failure_with_data("No news", Vec::<String>::new());
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["data"], serde_json::json!([]));
        assert_eq!(json["success"], serde_json::json!(false));
        assert_eq!(env.into_data(), None);
    }

    #[test]
    fn test_from_error_carries_detail() {
        let err = AppError::new(ErrorCode::UpstreamUnreachable, "connection refused")
            .context("Failed to fetch user data");
        let env = Envelope::<()>::from_error(&err);
        assert_eq!(env.message.as_deref(), Some("Failed to fetch user data"));
        assert_eq!(env.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_from_error_with_data() {
        let err = AppError::news_unavailable("Your API key is invalid.");
        let env = Envelope::from_error_with_data(&err, Vec::<u8>::new());
        assert!(!env.success);
        assert_eq!(env.data, Some(Vec::new()));
        assert_eq!(env.message.as_deref(), Some("Your API key is invalid."));
        assert_eq!(env.error, None);

        let err = AppError::new(ErrorCode::UpstreamTimeout, "operation timed out")
            .context("Failed to fetch news");
        let json = serde_json::to_value(Envelope::from_error_with_data(&err, Vec::<u8>::new())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "data": [],
                "message": "Failed to fetch news",
                "error": "operation timed out"
            })
        );
    }

    #[test]
    fn test_deserialize_failure_without_data() {
        let env: Envelope<Vec<u8>> =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.failure_message("fallback"), "nope");
        assert!(env.data.is_none());
    }
}
