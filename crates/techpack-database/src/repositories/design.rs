//! Design store: read-only access to the record store's `designs` table.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use techpack_core::error::{AppError, ErrorKind};
use techpack_core::result::AppResult;
use techpack_entity::design::Design;

/// Read-only boundary to the record store.
///
/// Design rows are owned and mutated elsewhere in the platform; the
/// sharing and export subsystem only fetches snapshots. Ownership checks
/// are done against the snapshot's `owner_id`.
#[async_trait]
pub trait DesignStore: Send + Sync + std::fmt::Debug {
    /// Fetch a design snapshot by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Design>>;
}

/// Postgres-backed design store.
#[derive(Debug, Clone)]
pub struct PgDesignStore {
    pool: PgPool,
}

impl PgDesignStore {
    /// Create a new design store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DesignStore for PgDesignStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Design>> {
        sqlx::query_as::<_, Design>("SELECT * FROM designs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find design", e))
    }
}
