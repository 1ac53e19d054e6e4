//! Design lookup and ownership checks.

pub mod service;

pub use service::DesignService;
