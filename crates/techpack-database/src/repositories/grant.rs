//! Share grant store: the single source of truth for the
//! one-live-grant-per-design invariant.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use techpack_core::error::{AppError, ErrorKind};
use techpack_core::result::AppResult;
use techpack_entity::share::ShareGrant;

/// Persistence for share grants.
///
/// `upsert` must be atomic per design id: two racing issuance calls for
/// the same design converge on one winning row rather than both believing
/// they created it. Reads never mutate; expiry is evaluated at read time.
#[async_trait]
pub trait GrantStore: Send + Sync + std::fmt::Debug {
    /// Return the grant for the design iff it has not expired yet.
    async fn get_live(&self, design_id: Uuid) -> AppResult<Option<ShareGrant>>;

    /// Insert a first grant or replace the existing one in a single
    /// conditional write: new token, fresh validity window, generation
    /// incremented.
    async fn upsert(&self, design_id: Uuid, token: &str, ttl_minutes: i64)
    -> AppResult<ShareGrant>;

    /// Reverse lookup by token. Returns the row even when expired so the
    /// resolver can tell an expired token apart from an unknown one.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareGrant>>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Postgres-backed grant store.
///
/// Atomicity comes from `share_grants.design_id` being the primary key:
/// the upsert is one `INSERT ... ON CONFLICT DO UPDATE` statement, so
/// Postgres serializes racing writers on the row lock.
#[derive(Debug, Clone)]
pub struct PgGrantStore {
    pool: PgPool,
}

impl PgGrantStore {
    /// Create a new grant store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GrantStore for PgGrantStore {
    async fn get_live(&self, design_id: Uuid) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM share_grants WHERE design_id = $1 AND expires_at > $2",
        )
        .bind(design_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find live grant", e))
    }

    async fn upsert(
        &self,
        design_id: Uuid,
        token: &str,
        ttl_minutes: i64,
    ) -> AppResult<ShareGrant> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(ttl_minutes);

        sqlx::query_as::<_, ShareGrant>(
            "INSERT INTO share_grants (design_id, token, generation, issued_at, expires_at) \
             VALUES ($1, $2, 1, $3, $4) \
             ON CONFLICT (design_id) DO UPDATE SET \
                 token = EXCLUDED.token, \
                 generation = share_grants.generation + 1, \
                 issued_at = EXCLUDED.issued_at, \
                 expires_at = EXCLUDED.expires_at \
             RETURNING design_id, token, generation, issued_at, expires_at",
        )
        .bind(design_id)
        .bind(token)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert share grant", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>("SELECT * FROM share_grants WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find grant by token", e)
            })
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
