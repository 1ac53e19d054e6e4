//! In-memory stores using a Tokio mutex, for tests and single-process
//! tooling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use techpack_core::result::AppResult;
use techpack_entity::design::Design;
use techpack_entity::share::ShareGrant;

use super::design::DesignStore;
use super::grant::GrantStore;

/// Internal state for the memory-based grant store.
#[derive(Debug, Default)]
struct GrantState {
    /// Grants keyed by design id. One entry per design, as in Postgres.
    grants: HashMap<Uuid, ShareGrant>,
    /// Reverse index from token to design id.
    tokens: HashMap<String, Uuid>,
}

/// In-memory grant store using a Tokio mutex for thread safety.
///
/// The whole upsert happens under one lock acquisition, which gives the
/// same racing-writers-converge behavior the Postgres row lock provides.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrantStore {
    state: Arc<Mutex<GrantState>>,
}

impl MemoryGrantStore {
    /// Creates an empty grant store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a grant verbatim, bypassing the generation counter.
    ///
    /// Lets tests seed states normal issuance cannot produce, such as an
    /// already-expired grant.
    pub async fn insert(&self, grant: ShareGrant) {
        let mut state = self.state.lock().await;
        let inner = &mut *state;
        if let Some(prev) = inner.grants.get(&grant.design_id) {
            inner.tokens.remove(&prev.token);
        }
        inner.tokens.insert(grant.token.clone(), grant.design_id);
        inner.grants.insert(grant.design_id, grant);
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn get_live(&self, design_id: Uuid) -> AppResult<Option<ShareGrant>> {
        let state = self.state.lock().await;
        Ok(state
            .grants
            .get(&design_id)
            .filter(|g| g.is_live(Utc::now()))
            .cloned())
    }

    async fn upsert(
        &self,
        design_id: Uuid,
        token: &str,
        ttl_minutes: i64,
    ) -> AppResult<ShareGrant> {
        let mut state = self.state.lock().await;
        let inner = &mut *state;

        let generation = match inner.grants.get(&design_id) {
            Some(prev) => {
                inner.tokens.remove(&prev.token);
                prev.generation + 1
            }
            None => 1,
        };

        let now = Utc::now();
        let grant = ShareGrant {
            design_id,
            token: token.to_string(),
            generation,
            issued_at: now,
            expires_at: now + chrono::Duration::minutes(ttl_minutes),
        };

        inner.tokens.insert(token.to_string(), design_id);
        inner.grants.insert(design_id, grant.clone());
        Ok(grant)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareGrant>> {
        let state = self.state.lock().await;
        Ok(state
            .tokens
            .get(token)
            .and_then(|design_id| state.grants.get(design_id))
            .cloned())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// In-memory design store.
#[derive(Debug, Clone, Default)]
pub struct MemoryDesignStore {
    designs: Arc<Mutex<HashMap<Uuid, Design>>>,
}

impl MemoryDesignStore {
    /// Creates an empty design store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a design snapshot.
    pub async fn insert(&self, design: Design) {
        self.designs.lock().await.insert(design.id, design);
    }

    /// Removes a design, leaving any grant pointing at it dangling.
    pub async fn remove(&self, id: Uuid) {
        self.designs.lock().await.remove(&id);
    }
}

#[async_trait]
impl DesignStore for MemoryDesignStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Design>> {
        Ok(self.designs.lock().await.get(&id).cloned())
    }
}
