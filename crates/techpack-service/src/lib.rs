//! # techpack-service
//!
//! Business logic service layer for TechPack. Each service orchestrates
//! stores and collaborators to implement one application-level use case:
//! owner access checks, share-grant issuance, anonymous token resolution,
//! and tech-pack document rendering.
//!
//! Services follow constructor injection. All dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod design;
pub mod share;
pub mod techpack;

pub use context::RequestContext;
pub use design::DesignService;
pub use share::{AccessService, ShareService, TokenGenerator};
pub use techpack::{HttpImageFetcher, ImageFetcher, TechPackService};
