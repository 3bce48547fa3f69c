use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Message returned to callers whenever the failure is internal.
pub const GENERIC_FAILURE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Database error: {0}")]
    Persistence(String),
    #[error("Hashing error: {0}")]
    Hashing(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// Text safe to hand back to the client. Internal failures collapse to
    /// [`GENERIC_FAILURE`].
    pub fn public_message(&self) -> String {
        match self {
            AppError::Persistence(_) | AppError::Hashing(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Hashing(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::NotFound(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Persistence(_) | AppError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("❌ {}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message(),
        })
    }
}
