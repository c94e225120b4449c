// Central Error Type for the Application

use std::time::Duration;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Publish error: {0}")]
    Publish(#[from] crate::port::PublishError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Broker operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AppError {
    /// True when the failure happened while handing the job to the broker
    /// (declare, publish, timeout or payload encoding).
    pub fn is_submission_failure(&self) -> bool {
        matches!(
            self,
            AppError::Publish(_) | AppError::Serialization(_) | AppError::Timeout(_)
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
