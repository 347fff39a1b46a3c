use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. `INVALID_STATE`.
    #[schema(example = "NOT_FOUND", value_type = String)]
    pub code: &'static str,
    #[schema(example = "leave request 42 not found")]
    pub message: String,
}

/// Every failure the portal can surface to a caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown policy, request or user (404).
    #[error("{0}")]
    NotFound(String),

    /// Dates out of order or in the past (400).
    #[error("{0}")]
    InvalidRange(String),

    /// Malformed or rule-breaking input (422).
    #[error("{0}")]
    Validation(String),

    /// Role or ownership check failed (403).
    #[error("{0}")]
    Forbidden(String),

    /// Transition attempted from a non-pending state (409).
    #[error("{0}")]
    InvalidState(String),

    /// Unique field already taken (409).
    #[error("{0}")]
    Conflict(String),

    /// Missing, invalid or expired credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Logged server side, never echoed to the client (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRange(_) => "INVALID_RANGE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRange(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidState(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Internal(details) => {
                tracing::error!(error = %details, "Internal error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message,
            },
        })
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Internal(format!("password hashing failed: {value}"))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("token encoding failed: {value}"))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(value: actix_web::error::BlockingError) -> Self {
        Self::Internal(format!("blocking task failed: {value}"))
    }
}
