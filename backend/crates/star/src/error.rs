//! STAR Error Types
//!
//! Delegation-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Callers switch on [`StarError::kind`],
//! never on message text.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// STAR-specific result type alias
pub type StarResult<T> = Result<T, StarError>;

/// STAR-specific error variants
#[derive(Debug, Error)]
pub enum StarError {
    /// A mandatory field was absent from a creation request
    #[error("Missing non optional parameter: {0}")]
    MissingParameter(&'static str),

    /// Present fields have invalid syntax or an invalid combination
    #[error("Bad parameter supplied: {0}")]
    BadParameter(String),

    /// The id is malformed or no delegation carries it
    #[error("Delegation unknown")]
    UnknownResource,

    /// Database error (including schema constraint violations)
    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Non-database storage engine failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StarError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StarError::MissingParameter(_) | StarError::BadParameter(_) => ErrorKind::BadRequest,
            StarError::UnknownResource => ErrorKind::NotFound,
            StarError::Persistence(_) | StarError::Storage(_) | StarError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Client-facing part of the AppError
    ///
    /// Server-side failures are reported with a generic message.
    fn public_error(&self) -> AppError {
        match self {
            StarError::MissingParameter(field) => AppError::new(self.kind(), self.to_string())
                .with_action(format!("Supply the `{field}` field in the request body")),
            StarError::BadParameter(_) | StarError::UnknownResource => {
                AppError::new(self.kind(), self.to_string())
            }
            StarError::Persistence(_) | StarError::Storage(_) | StarError::Internal(_) => {
                AppError::new(self.kind(), "The delegation could not be processed")
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            StarError::Persistence(e) => {
                tracing::error!(error = %e, "Delegation database error");
            }
            StarError::Storage(msg) => {
                tracing::error!(message = %msg, "Delegation storage error");
            }
            StarError::Internal(msg) => {
                tracing::error!(message = %msg, "Delegation internal error");
            }
            StarError::BadParameter(reason) => {
                tracing::warn!(reason = %reason, "Rejected delegation request");
            }
            _ => {
                tracing::debug!(error = %self, "Delegation error");
            }
        }
    }
}

/// Server-side failures keep the original error as the AppError source.
impl From<StarError> for AppError {
    fn from(err: StarError) -> Self {
        let app_error = err.public_error();
        if err.kind().is_server_error() {
            app_error.with_source(err)
        } else {
            app_error
        }
    }
}

impl IntoResponse for StarError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
