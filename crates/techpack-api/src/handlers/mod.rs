//! Route handlers organized by domain.

pub mod health;
pub mod share;
pub mod techpack;
