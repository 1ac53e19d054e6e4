//! Design domain entities.

pub mod model;

pub use model::Design;
