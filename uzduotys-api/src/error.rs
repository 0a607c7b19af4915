/// Error handling for the HTTP layer
///
/// Handlers return `Result<T, AppError>`. The error converts into a
/// rendered status page: 404 for missing or not-owned resources, 403
/// for forbidden requests, 500 for anything internal. Internal detail
/// is logged, never shown to the client.
///
/// Recoverable failures (bad form input, duplicate identity, bad
/// credentials, bad reset tokens) are not errors here; handlers turn
/// them into re-rendered forms or flash-message redirects directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uzduotys_shared::{auth::password::PasswordError, auth::token::TokenError, models::StoreError};
use validator::ValidationErrors;

use crate::views;

/// Result type for route handlers
pub type AppResult<T> = Result<T, AppError>;

/// Unified handler error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Resource absent, or present but not owned by the caller (404)
    #[error("not found")]
    NotFound,

    /// Forbidden (403)
    #[error("forbidden")]
    Forbidden,

    /// Internal server error (500)
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, views::status_page(StatusCode::NOT_FOUND)).into_response()
            }
            AppError::Forbidden => {
                (StatusCode::FORBIDDEN, views::status_page(StatusCode::FORBIDDEN)).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::status_page(StatusCode::INTERNAL_SERVER_ERROR),
                )
                    .into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            // Duplicates are handled where the insert happens; one
            // reaching this conversion is a handler bug
            StoreError::Duplicate(field) => {
                AppError::Internal(format!("unhandled duplicate {}", field.as_str()))
            }
            StoreError::Database(e) => AppError::Internal(format!("database error: {}", e)),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(format!("database error: {}", err))
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(format!("password operation failed: {}", err))
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        // Token creation failing is internal; verification failures are
        // handled in the reset/session flows before this conversion
        AppError::Internal(format!("token operation failed: {}", err))
    }
}

/// One field-level validation failure
#[derive(Debug, Clone)]
pub struct FieldError {
    /// Form field the message belongs to
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Flattens `validator` output into field-level messages
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
            })
        })
        .collect()
}
