//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use techpack_auth::jwt::decoder::JwtDecoder;
use techpack_core::config::AppConfig;
use techpack_database::GrantStore;
use techpack_service::design::DesignService;
use techpack_service::share::{AccessService, ShareService};
use techpack_service::techpack::TechPackService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,

    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,

    /// Grant store, used directly by the readiness probe.
    pub grant_store: Arc<dyn GrantStore>,

    /// Owner-facing design access.
    pub design_service: Arc<DesignService>,
    /// Share grant issuance and rotation.
    pub share_service: Arc<ShareService>,
    /// Anonymous share token resolution.
    pub access_service: Arc<AccessService>,
    /// Tech pack PDF generation.
    pub techpack_service: Arc<TechPackService>,
}
