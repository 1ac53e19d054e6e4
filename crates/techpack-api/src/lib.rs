//! # techpack-api
//!
//! HTTP API layer for TechPack built on Axum.
//!
//! Provides the REST endpoints, middleware (CORS, compression, logging),
//! extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
