//! Error handling middleware - `{error, details}` JSON responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use patrol_core::error::{DomainError, RepoError};
use patrol_shared::ErrorResponse;

/// Application-level error type rendered as `{error, details?}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body, query or form could not be parsed.
    #[error("{error}: {details}")]
    Malformed { error: &'static str, details: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {error}")]
    Internal {
        error: &'static str,
        details: Option<String>,
    },
}

impl AppError {
    pub fn internal(error: &'static str, details: impl ToString) -> Self {
        AppError::Internal {
            error,
            details: Some(details.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Malformed { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                ErrorResponse::new(msg.clone())
            }
            AppError::Malformed { error, details } => {
                ErrorResponse::new(*error).with_details(details.clone())
            }
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::new("Forbidden"),
            AppError::Internal { error, details } => {
                tracing::error!(details = details.as_deref().unwrap_or(""), "{}", error);
                let body = ErrorResponse::new(*error);
                match details {
                    Some(details) => body.with_details(details.clone()),
                    None => body,
                }
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::MissingFields(_) => AppError::BadRequest(err.to_string()),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            // The approved-slug conflict is reported as a client error, not 409.
            DomainError::Conflict(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Storage(e) => AppError::internal("Failed to upload image", e),
            DomainError::Repository(e) => e.into(),
            DomainError::Internal(msg) => AppError::internal("Internal server error", msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            other => AppError::internal("Database error", other),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
