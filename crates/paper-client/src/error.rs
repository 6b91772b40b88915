//! Client error types

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Structured error payload returned by the API on any non-200 response
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Human-readable summary
    #[serde(rename = "error_summary")]
    pub summary: String,
    /// Structured error details
    #[serde(rename = "error", default)]
    pub metadata: HashMap<String, String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.summary, self.metadata)
    }
}

impl std::error::Error for ApiError {}

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// JSON serialization or deserialization failed
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Network failure before a complete response was obtained
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-200 status and an error payload
    #[error("API error ({status}): {error}")]
    Remote { status: u16, error: ApiError },

    /// The call context was cancelled or its deadline elapsed
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Check if the call was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The remote error payload, if the server returned one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Remote { error, .. } => Some(error),
            _ => None,
        }
    }

    /// HTTP status of a remote error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_error() {
        let json = r#"{"error_summary": "doc_not_found/...", "error": {".tag": "doc_not_found"}}"#;

        let error: ApiError = serde_json::from_str(json).unwrap();

        assert_eq!(error.summary, "doc_not_found/...");
        assert_eq!(error.metadata.get(".tag").map(String::as_str), Some("doc_not_found"));
    }

    #[test]
    fn test_api_error_without_details() {
        let error: ApiError = serde_json::from_str(r#"{"error_summary": "oops"}"#).unwrap();
        assert_eq!(error.summary, "oops");
        assert!(error.metadata.is_empty());
    }

    #[test]
    fn test_remote_error_accessors() {
        let error = ClientError::Remote {
            status: 409,
            error: ApiError {
                summary: "conflict".to_string(),
                metadata: HashMap::from([("reason".to_string(), "x".to_string())]),
            },
        };

        assert_eq!(error.status(), Some(409));
        assert_eq!(error.api_error().unwrap().summary, "conflict");
        assert!(!error.is_cancelled());
        assert_eq!(error.to_string(), r#"API error (409): conflict: {"reason": "x"}"#);
    }

    #[test]
    fn test_cancelled_has_no_payload() {
        assert!(ClientError::Cancelled.is_cancelled());
        assert!(ClientError::Cancelled.api_error().is_none());
        assert!(ClientError::Cancelled.status().is_none());
    }
}
