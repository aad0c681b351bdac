//! # Error Handling
//!
//! Every handler returns `Result<_, ApiError>`. Variants map to HTTP status
//! codes and carry only sanitized, user-facing text; storage errors are logged
//! through `tracing` and replaced by a generic "Data unavailable" message.
//!
//! | Variant            | Status | Raised for                                          |
//! |--------------------|--------|-----------------------------------------------------|
//! | `BadRequest`       | 400    | malformed criteria, sort or page parameters; booking rules |
//! | `NotFound`         | 404    | missing entity                                      |
//! | `Conflict`         | 409    | duplicate keys, overlapping bookings, bad status transitions |
//! | `ValidationFailed` | 422    | invalid create/update payloads                      |
//! | `Unavailable`      | 503    | storage access failures (never retried here)        |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;

use crate::validation::ValidationErrors;

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from user
    BadRequest {
        /// User-facing error message
        message: String,
        /// One entry per rejected field, if the request had several problems
        details: Vec<String>,
    },

    /// 404 Not Found - Resource doesn't exist
    NotFound {
        /// Resource type (e.g., "Vehicle", "Rental")
        resource: String,
        /// Optional ID that wasn't found
        id: Option<String>,
    },

    /// 409 Conflict - Resource conflict (e.g., duplicate key, double booking)
    Conflict { message: String },

    /// 422 Unprocessable Entity - Payload validation failed
    ValidationFailed { errors: Vec<String> },

    /// 503 Service Unavailable - Storage failure (details logged, not exposed)
    Unavailable { internal: DbErr },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Wraps a storage error. The error itself is logged, never returned.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Unavailable { internal: err }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::BadRequest { message, .. } | Self::Conflict { message } => message.clone(),
            Self::ValidationFailed { errors } => {
                if let [single] = errors.as_slice() {
                    single.clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
            Self::Unavailable { .. } => "Data unavailable".to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Unavailable { internal } => {
                tracing::error!(error = ?internal, "Storage access failed");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            Self::BadRequest { message, details } => ErrorResponse {
                error: message.clone(),
                details: (!details.is_empty()).then(|| details.clone()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// `RecordNotFound` becomes 404 and unique-key violations 409; every other
/// storage error becomes 503 "Data unavailable".
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let DbErr::RecordNotFound(msg) = &err {
            let resource = msg.split_whitespace().next().unwrap_or("Resource");
            return Self::not_found(resource, None);
        }
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!(detail = %detail, "Unique constraint violated");
            return Self::conflict("A record with the same unique value already exists");
        }
        Self::database(err)
    }
}

/// Rejected criteria, sort or page parameters.
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::BadRequest {
            message: format!("Invalid query: {errors}"),
            details: errors.messages(),
        }
    }
}
