//! HTTP Request/Response Types

use serde::{Deserialize, Serialize};

pub const STATUS_RUNNING: &str = "Server is running";
pub const STATUS_JOB_SUBMITTED: &str = "Job Submitted";

pub const ERROR_UNAUTHORIZED: &str = "Unauthorized";
pub const ERROR_SUBMIT_FAILED: &str = "Failed to submit job";
pub const ERROR_INVALID_BODY: &str = "Invalid JSON body";
pub const ERROR_UNSUPPORTED_MEDIA_TYPE: &str = "Unsupported Media Type";
pub const ERROR_NOT_FOUND: &str = "Not Found";
pub const ERROR_INTERNAL: &str = "Internal server error";

/// Success body: `{"status": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn running() -> Self {
        Self {
            status: STATUS_RUNNING.to_string(),
        }
    }

    pub fn job_submitted() -> Self {
        Self {
            status: STATUS_JOB_SUBMITTED.to_string(),
        }
    }
}

/// Failure body: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
