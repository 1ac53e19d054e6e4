//! Route definitions for the TechPack HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Builds the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(design_routes())
        .merge(share_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Owner-facing design endpoints: share issuance and private export.
fn design_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/designs/{id}/share",
            post(handlers::share::issue_share_link),
        )
        .route(
            "/designs/{id}/export",
            get(handlers::techpack::export_own_design),
        )
}

/// Anonymous share endpoints: snapshot and export by token.
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/share/{token}", get(handlers::share::resolve_share_link))
        .route(
            "/share/{token}/export",
            get(handlers::techpack::export_shared_design),
        )
}

/// Liveness and readiness probes.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::health_ready))
}
