//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every failure path renders the standard JSON
//! envelope.

use std::sync::OnceLock;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;
use crate::shopify::ShopifyError;

/// Whether failure envelopes include the underlying error detail.
///
/// Set once at startup from the deployment environment; defaults to hidden
/// so an uninitialized process never leaks detail.
static EXPOSE_ERROR_DETAIL: OnceLock<bool> = OnceLock::new();

/// Configure error-detail exposure. Call once from `main` before serving.
pub fn init_error_detail(expose: bool) {
    EXPOSE_ERROR_DETAIL.get_or_init(|| expose);
}

fn expose_error_detail() -> bool {
    *EXPOSE_ERROR_DETAIL.get().unwrap_or(&false)
}

/// Application-level error type for the discount configuration service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Request payload failed validation.
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::Conflict(_))
            | Self::Shopify(ShopifyError::UserError(_))
            | Self::Validation(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Client-safe message for the envelope.
    fn message(&self) -> String {
        match self {
            Self::Database(RepositoryError::Conflict(message)) => message.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Shopify(ShopifyError::UserError(detail)) => {
                format!("Shopify rejected the request: {detail}")
            }
            Self::Shopify(_) => "Failed to sync configuration to Shopify".to_owned(),
            Self::Validation(_) => "Validation error".to_owned(),
            Self::BadRequest(message) | Self::NotFound(message) => message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut envelope = ApiResponse::<()>::failure(self.message());

        if let Self::Validation(errors) = &self {
            envelope = envelope.with_errors(errors.clone());
        }

        // Underlying detail is only shown outside production
        if expose_error_detail() && status.is_server_error() {
            envelope = envelope.with_error_detail(self.to_string());
        }

        (status, Json(envelope)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
