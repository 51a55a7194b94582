use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::types::{AppError, AppState};

/// Authentication gate applied to every route except the health checks.
///
/// The presented `X-API-Key` header is compared against the process credential;
/// on mismatch or absence the request is rejected with 401 before any handler
/// runs. The presented value is never logged.
pub async fn api_key_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let verdict = req
        .headers()
        .get("X-API-Key")
        .and_then(|h| h.to_str().ok())
        .map(|key| state.api_key.verify(key));

    match verdict {
        Some(true) => Ok(next.run(req).await),
        Some(false) => {
            tracing::warn!("rejected request to {}: invalid API key", req.uri().path());
            Err(AppError::Unauthorized)
        }
        None => {
            tracing::warn!("rejected request to {}: missing API key", req.uri().path());
            Err(AppError::Unauthorized)
        }
    }
}
