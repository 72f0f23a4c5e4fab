use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::import::ImportError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(e) = self {
            log::error!("request failed: {e:#}");
        }
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::Empty | ImportError::ConfirmationRequired(_) => {
                ApiError::BadRequest(e.to_string())
            }
            ImportError::UnknownRun(_) => ApiError::NotFound(e.to_string()),
            ImportError::RunInProgress(_) => ApiError::Conflict(e.to_string()),
            ImportError::Backend(inner) => ApiError::Internal(inner),
        }
    }
}
