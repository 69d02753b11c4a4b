//! Error handling for the Sevalla API client
//!
//! Every HTTP failure status surfaces as [`SevallaError::Api`] carrying the
//! status code and the best message the platform returned. Callers that need
//! to recognise a particular failure use the `is_*` helpers rather than
//! matching on message text.
//!
//! # Example
//!
//! ```rust
//! use sevalla_api::SevallaError;
//!
//! let err = SevallaError::Api {
//!     status: 404,
//!     message: "Application not found".to_string(),
//! };
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "HTTP 404: Application not found");
//! ```

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by the transport, resource services and operation poller
#[derive(Error, Debug)]
pub enum SevallaError {
    /// The platform answered with a status code of 400 or above
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (connect failure, timeout, TLS)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A success response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The caller cancelled the request or wait
    #[error("Request cancelled")]
    Cancelled,

    /// Fetching an operation's status failed while polling
    #[error("Failed to get status of operation {operation_id}: {source}")]
    OperationStatus {
        operation_id: String,
        #[source]
        source: Box<SevallaError>,
    },

    /// An asynchronous operation reached the failed state
    #[error("Operation {operation_id} {}", describe_failure(.message))]
    OperationFailed {
        operation_id: String,
        message: Option<String>,
    },

    /// An asynchronous operation did not finish before the deadline
    #[error("Operation {operation_id} timed out after {timeout:?}")]
    OperationTimeout {
        operation_id: String,
        timeout: Duration,
    },

    /// An operation completed without telling us which resource it produced
    #[error("Operation {0} completed but resource ID not found")]
    MissingResourceId(String),
}

fn describe_failure(message: &Option<String>) -> String {
    match message {
        Some(message) => format!("failed: {}", message),
        None => "failed with unknown error".to_string(),
    }
}

/// Result type alias for Sevalla API operations
pub type Result<T> = std::result::Result<T, SevallaError>;

impl SevallaError {
    /// HTTP status code of an API failure, looking through poll wrappers
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            SevallaError::Api { status, .. } => Some(*status),
            SevallaError::Request(e) => e.status().map(|s| s.as_u16()),
            SevallaError::OperationStatus { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Returns true if this is a request or operation timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            SevallaError::Request(e) => e.is_timeout(),
            SevallaError::OperationTimeout { .. } => true,
            SevallaError::OperationStatus { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Returns true if the caller cancelled the call
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SevallaError::Cancelled)
    }

    /// Build the error for a failure response.
    ///
    /// Uses `message`, then `error` from a `{"error", "message"}` body, and
    /// falls back to the trimmed raw body when neither is present.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            error: Option<String>,
            #[serde(default)]
            message: Option<String>,
        }

        let parsed = serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| {
            [b.message, b.error]
                .into_iter()
                .flatten()
                .find(|s| !s.is_empty())
        });

        SevallaError::Api {
            status,
            message: parsed.unwrap_or_else(|| body.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_preferred_over_error() {
        let err = SevallaError::from_response(
            422,
            r#"{"error": "Unprocessable", "message": "display_name is required"}"#,
        );
        assert_eq!(err.to_string(), "HTTP 422: display_name is required");
    }

    #[test]
    fn test_error_field_when_message_empty() {
        let err = SevallaError::from_response(401, r#"{"error": "Unauthorized", "message": ""}"#);
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_raw_body_when_not_json() {
        let err = SevallaError::from_response(502, "  <html>Bad Gateway</html>\n");
        assert_eq!(err.to_string(), "HTTP 502: <html>Bad Gateway</html>");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_raw_body_when_fields_missing() {
        let err = SevallaError::from_response(400, r#"{"errors": ["bad"]}"#);
        assert_eq!(err.to_string(), r#"HTTP 400: {"errors": ["bad"]}"#);
    }

    #[test]
    fn test_raw_body_when_error_is_an_object() {
        let body = r#"{"error": {"code": 500}}"#;
        let err = SevallaError::from_response(500, body);
        assert_eq!(err.to_string(), format!("HTTP 500: {}", body));
    }

    #[test]
    fn test_not_found_helpers() {
        let err = SevallaError::from_response(404, r#"{"message": "Not found"}"#);
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_status_seen_through_poll_wrapper() {
        let err = SevallaError::OperationStatus {
            operation_id: "op_1".to_string(),
            source: Box::new(SevallaError::from_response(404, "gone")),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("op_1"));
    }

    #[test]
    fn test_operation_failed_display() {
        let err = SevallaError::OperationFailed {
            operation_id: "op_1".to_string(),
            message: Some("quota exceeded".to_string()),
        };
        assert_eq!(err.to_string(), "Operation op_1 failed: quota exceeded");

        let err = SevallaError::OperationFailed {
            operation_id: "op_2".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "Operation op_2 failed with unknown error");
    }

    #[test]
    fn test_operation_timeout() {
        let err = SevallaError::OperationTimeout {
            operation_id: "op_1".to_string(),
            timeout: Duration::from_secs(600),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out"));
    }
}
