//! Middleware for the REST API server.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Create CORS middleware.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Request logging middleware.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

/// API key middleware.
///
/// Requires a non-empty `X-API-Key` header. When the service is configured
/// with a key list the header must match one of them.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if key.is_empty() {
        return Err(ApiError::unauthorized(
            "API key required. Please provide X-API-Key header.",
        ));
    }
    if !state.config().accepts_api_key(key) {
        warn!(uri = %request.uri(), "Rejected API key");
        return Err(ApiError::unauthorized("Invalid API key."));
    }

    Ok(next.run(request).await)
}
