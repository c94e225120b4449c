//! HTTP Error Types
//!
//! Maps application errors to status codes and fixed JSON bodies. Internal
//! detail stays in the logs.

use crate::types::{
    ErrorResponse, ERROR_INTERNAL, ERROR_INVALID_BODY, ERROR_SUBMIT_FAILED, ERROR_UNAUTHORIZED,
    ERROR_UNSUPPORTED_MEDIA_TYPE,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobgate_core::domain::DomainError;
use jobgate_core::error::AppError;
use std::net::SocketAddr;
use thiserror::Error;

/// Error returned from handlers and middleware
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ERROR_UNAUTHORIZED),
            AppError::Domain(DomainError::InvalidBody(_)) => {
                (StatusCode::BAD_REQUEST, ERROR_INVALID_BODY)
            }
            AppError::Domain(DomainError::UnsupportedContentType(_)) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, ERROR_UNSUPPORTED_MEDIA_TYPE)
            }
            err if err.is_submission_failure() => {
                (StatusCode::INTERNAL_SERVER_ERROR, ERROR_SUBMIT_FAILED)
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ERROR_INTERNAL),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Failure to start the HTTP server (fatal at startup)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read local address: {0}")]
    LocalAddr(std::io::Error),

    #[error("Server task failed: {0}")]
    Join(String),

    #[error("Server error on {addr}: {source}")]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
