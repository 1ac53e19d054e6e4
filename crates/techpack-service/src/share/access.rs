//! Anonymous share token resolution.

use std::sync::Arc;

use chrono::Utc;
use techpack_core::{AppError, AppResult};
use techpack_database::{DesignStore, GrantStore};
use techpack_entity::design::Design;
use tracing::{debug, warn};

/// Single public rejection message.
///
/// Unknown, expired, and rotated-away tokens all fail with the same
/// wording so a caller cannot probe which tokens ever existed.
const PUBLIC_NOT_FOUND: &str = "Share link is invalid or has expired";

/// Service for resolving anonymous share tokens into designs.
#[derive(Debug, Clone)]
pub struct AccessService {
    grant_store: Arc<dyn GrantStore>,
    design_store: Arc<dyn DesignStore>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(grant_store: Arc<dyn GrantStore>, design_store: Arc<dyn DesignStore>) -> Self {
        Self {
            grant_store,
            design_store,
        }
    }

    /// Resolves a share token to the design it grants access to.
    ///
    /// Takes no caller identity. The token is the whole capability, and
    /// every rejection uses one indistinguishable message.
    pub async fn resolve(&self, token: &str) -> AppResult<Design> {
        let Some(grant) = self.grant_store.find_by_token(token).await? else {
            debug!("Rejected unknown share token");
            return Err(AppError::not_found(PUBLIC_NOT_FOUND));
        };

        if !grant.is_live(Utc::now()) {
            debug!(
                design_id = %grant.design_id,
                generation = grant.generation,
                expired_at = %grant.expires_at,
                "Rejected expired share token"
            );
            return Err(AppError::not_found(PUBLIC_NOT_FOUND));
        }

        let Some(design) = self.design_store.find_by_id(grant.design_id).await? else {
            warn!(
                design_id = %grant.design_id,
                "Share grant points at a missing design"
            );
            return Err(AppError::not_found(PUBLIC_NOT_FOUND));
        };

        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use techpack_core::config::share::ShareConfig;
    use techpack_core::error::ErrorKind;
    use techpack_database::repositories::memory::{MemoryDesignStore, MemoryGrantStore};
    use techpack_entity::design::Design;
    use techpack_entity::share::ShareGrant;
    use uuid::Uuid;

    use crate::share::service::ShareService;
    use crate::share::token::TokenGenerator;

    use super::*;

    fn design() -> Design {
        Design {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            image_url: "https://cdn.example.com/designs/table.png".to_string(),
            width: Some(90.0),
            height: Some(75.0),
            depth: Some(90.0),
            material: Some("Oak".to_string()),
            color: Some("Ebony".to_string()),
            created_at: Utc::now(),
        }
    }

    struct Setup {
        access: AccessService,
        share: ShareService,
        grants: MemoryGrantStore,
        designs: MemoryDesignStore,
        design: Design,
    }

    async fn setup() -> Setup {
        let grants = MemoryGrantStore::new();
        let designs = MemoryDesignStore::new();
        let design = design();
        designs.insert(design.clone()).await;
        let access = AccessService::new(Arc::new(grants.clone()), Arc::new(designs.clone()));
        let share = ShareService::new(
            Arc::new(grants.clone()),
            Arc::new(designs.clone()),
            Arc::new(TokenGenerator::new()),
            ShareConfig::default(),
        );
        Setup {
            access,
            share,
            grants,
            designs,
            design,
        }
    }

    #[tokio::test]
    async fn valid_token_resolves_to_the_design() {
        let s = setup().await;
        let grant = s.share.issue(s.design.id, None, false).await.unwrap();

        let resolved = s.access.resolve(&grant.token).await.unwrap();
        assert_eq!(resolved.id, s.design.id);
    }

    #[tokio::test]
    async fn unknown_and_expired_tokens_fail_identically() {
        let s = setup().await;

        let now = Utc::now();
        s.grants
            .insert(ShareGrant {
                design_id: s.design.id,
                token: "expired-token".to_string(),
                generation: 1,
                issued_at: now - Duration::minutes(20),
                expires_at: now - Duration::minutes(10),
            })
            .await;

        let unknown = s.access.resolve("no-such-token").await.unwrap_err();
        let expired = s.access.resolve("expired-token").await.unwrap_err();

        assert_eq!(unknown.kind, ErrorKind::NotFound);
        assert_eq!(expired.kind, ErrorKind::NotFound);
        assert_eq!(unknown.message, expired.message);
    }

    #[tokio::test]
    async fn rotation_invalidates_the_old_token() {
        let s = setup().await;

        let old = s.share.issue(s.design.id, None, false).await.unwrap();
        let new = s.share.issue(s.design.id, None, true).await.unwrap();

        let err = s.access.resolve(&old.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let resolved = s.access.resolve(&new.token).await.unwrap();
        assert_eq!(resolved.id, s.design.id);
    }

    #[tokio::test]
    async fn grant_without_a_design_is_rejected() {
        let s = setup().await;

        let orphan = Uuid::new_v4();
        s.designs
            .insert(Design {
                id: orphan,
                ..design()
            })
            .await;
        let grant = s.share.issue(orphan, None, false).await.unwrap();
        s.designs.remove(orphan).await;

        let err = s.access.resolve(&grant.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Share link is invalid or has expired");
    }
}
