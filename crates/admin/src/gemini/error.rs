//! Error types for the Gemini content-generation client.

use thiserror::Error;

/// Errors that can occur when generating content.
///
/// Each category maps to a distinct operator-facing message; malformed
/// output carries the raw model text so the operator can retry or fix the
/// content manually.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model refused to generate for safety reasons.
    #[error("content blocked for safety reasons; try a different prompt")]
    SafetyBlocked,

    /// API quota or rate limit exhausted.
    #[error("generation quota exhausted; retry in a few minutes")]
    QuotaExceeded,

    /// The model produced output that is not the requested JSON.
    #[error("model output was not valid JSON: {detail}")]
    MalformedOutput {
        /// Parse failure detail.
        detail: String,
        /// Raw model output, kept for diagnosis and manual recovery.
        raw: String,
    },

    /// Any other API-level error.
    #[error("API error ({status}): {message}")]
    Api {
        /// Status string from the API (e.g. `INVALID_ARGUMENT`).
        status: String,
        /// Error message.
        message: String,
    },

    /// The response carried no generated text at all.
    #[error("empty response from model")]
    EmptyResponse,
}

/// API error response envelope.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Numeric HTTP-style code.
    #[serde(default)]
    pub code: i64,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Status string (e.g. `RESOURCE_EXHAUSTED`).
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GeminiError::QuotaExceeded.to_string(),
            "generation quota exhausted; retry in a few minutes"
        );
        let err = GeminiError::MalformedOutput {
            detail: "expected value at line 1".to_string(),
            raw: "not json".to_string(),
        };
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.code, 429);
        assert_eq!(response.error.status, "RESOURCE_EXHAUSTED");
    }
}
