//! Application builder wiring router, middleware, and state into an
//! Axum app.

use axum::middleware as axum_middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(axum_middleware::from_fn(
            crate::middleware::logging::request_logging,
        ))
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
