//! Route definitions for the REST API.

mod addresses;
mod health;

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};

use crate::middleware::api_key_middleware;
use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    // Versioned API, guarded by the API key check
    let v1 = Router::new()
        .route("/addresses/recognize", put(addresses::recognize_address))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .nest("/v1", v1)
        // Attach state
        .with_state(state)
}

pub use addresses::*;
pub use health::*;
