//! API key middleware (credential gate for job intake)

use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use jobgate_core::error::AppError;
use tracing::warn;

/// Header carrying the caller's credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject the request with 401 unless `x-api-key` is in the allow-list.
///
/// Runs before the body is read and before any broker interaction.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if !state.credentials.is_authorized(presented) {
        warn!(
            path = %request.uri().path(),
            key_present = presented.is_some(),
            "Rejected request: invalid API key"
        );
        return Err(AppError::Unauthorized.into());
    }

    Ok(next.run(request).await)
}
