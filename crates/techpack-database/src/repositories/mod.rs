//! Store traits and their implementations.
//!
//! The service layer only ever sees the [`DesignStore`] and [`GrantStore`]
//! traits; whether the rows live in Postgres or in a process-local map is
//! an assembly-time choice.

pub mod design;
pub mod grant;
pub mod memory;

pub use design::{DesignStore, PgDesignStore};
pub use grant::{GrantStore, PgGrantStore};
pub use memory::{MemoryDesignStore, MemoryGrantStore};
