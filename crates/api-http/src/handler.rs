//! HTTP Handlers

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ErrorResponse, StatusResponse, ERROR_NOT_FOUND};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use jobgate_core::domain::{DomainError, JobSubmission};
use jobgate_core::error::AppError;
use tracing::info;

/// How a request body is turned into a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Text,
}

/// `application/json`, `*+json` and a missing header parse as JSON;
/// `text/plain` is taken as a string; anything else is refused.
fn body_kind(headers: &HeaderMap) -> Result<BodyKind, DomainError> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return Ok(BodyKind::Json);
    };

    let raw = value
        .to_str()
        .map_err(|_| DomainError::UnsupportedContentType("<non-ascii>".to_string()))?;
    let mime = raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => Ok(BodyKind::Json),
        "text/plain" => Ok(BodyKind::Text),
        m if m.starts_with("application/") && m.ends_with("+json") => Ok(BodyKind::Json),
        _ => Err(DomainError::UnsupportedContentType(mime)),
    }
}

/// GET / - liveness check, independent of broker state
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::running())
}

/// POST /jobs/ - relay the body to the configured exchange
pub async fn submit_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let submission = match body_kind(&headers).map_err(AppError::from)? {
        BodyKind::Json => JobSubmission::from_slice(&body),
        BodyKind::Text => JobSubmission::from_text(&body),
    }
    .map_err(AppError::from)?;

    state.intake.submit(&submission).await?;

    info!(
        exchange = %state.intake.target().exchange,
        bytes = body.len(),
        "Job submitted"
    );

    Ok(Json(StatusResponse::job_submitted()))
}

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(ERROR_NOT_FOUND)))
}
