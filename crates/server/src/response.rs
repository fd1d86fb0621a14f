//! API response envelope.
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! {
//!     "success": true,
//!     "message": "Configuration saved successfully",
//!     "data": { ... }
//! }
//! ```
//!
//! Failure envelopes carry `errors` (a list of validation messages) and, in
//! non-production deployments, an `error` field with the underlying detail.

use serde::{Deserialize, Serialize};

/// Unified API response structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Validation messages (optional, failure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Underlying error detail (optional, non-production failure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data and a message.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
            error: None,
        }
    }

    /// Create a failure response with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: None,
            error: None,
        }
    }

    /// Attach validation messages to a failure response.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Attach underlying error detail to a failure response.
    #[must_use]
    pub fn with_error_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }
}
