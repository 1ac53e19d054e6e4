//! # techpack-database
//!
//! PostgreSQL connection management, migrations, and the store traits the
//! service layer depends on. Ships two implementations per store: one
//! backed by Postgres for production and one backed by memory for tests
//! and single-process tooling.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use repositories::{DesignStore, GrantStore};
