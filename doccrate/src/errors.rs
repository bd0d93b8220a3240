//! # Error Handling for CRUD routes
//!
//! Two tiers reach the client:
//!
//! - **Not found**: a lookup by identifier matched nothing. Always `404`.
//! - **Store errors**: anything the backing store raised. These are not
//!   retried or recovered. A malformed identifier becomes `400`, a duplicate
//!   key `409`, everything else `500` with a generic message while the real
//!   error is logged through `tracing`.
//!
//! Guards and custom operations can return any other variant.
//!
//! ## Logging
//!
//! Internal errors are logged with `tracing`. Nothing is printed unless the
//! application installs a subscriber:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt().with_target(false).compact().init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - no record with this identifier
    NotFound {
        /// Resource type (e.g., "widget")
        resource: String,
        /// Identifier that wasn't found
        id: Option<String>,
    },

    /// 400 Bad Request - Invalid input from user
    BadRequest { message: String },

    /// 401 Unauthorized - Authentication required or failed
    Unauthorized { message: String },

    /// 403 Forbidden - Caller lacks permission
    Forbidden { message: String },

    /// 409 Conflict - duplicate key
    Conflict { message: String },

    /// 422 Unprocessable Entity - request parameters out of range
    ValidationFailed { errors: Vec<String> },

    /// 500 Internal Server Error - store failure (details logged, not exposed)
    Store {
        message: String,
        internal: StoreError,
    },

    /// Custom error with specific status code
    Custom {
        status: StatusCode,
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 401 Unauthorized error
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(ApiError::unauthorized("Missing bearer token"));
    /// ```
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
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

    /// Wrap a store failure as a 500. Use `ApiError::from` to get the
    /// identifier and duplicate-key mappings instead.
    #[must_use]
    pub fn store(err: StoreError) -> Self {
        Self::Store {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    pub fn custom(status: StatusCode, message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Custom {
            status,
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom { status, .. } => *status,
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
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Conflict { message }
            | Self::Store { message, .. }
            | Self::Custom { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Store { internal, .. } => {
                tracing::error!(error = ?internal, "Store error occurred");
            }
            Self::Custom {
                internal: Some(details),
                status,
                ..
            } => {
                tracing::error!(status = %status, details = %details, "Custom error occurred");
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

/// Convert a store failure to an `ApiError`.
///
/// - `StoreError::InvalidId` → 400 Bad Request
/// - `StoreError::DuplicateKey` → 409 Conflict
/// - everything else → 500, logged and sanitized
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId { .. } => Self::BadRequest {
                message: err.to_string(),
            },
            StoreError::DuplicateKey(_) => Self::Conflict {
                message: "Duplicate record".to_string(),
            },
            other => Self::store(other),
        }
    }
}
