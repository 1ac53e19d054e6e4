//! Share grant issuance.

use std::sync::Arc;

use techpack_core::config::share::ShareConfig;
use techpack_core::{AppError, AppResult};
use techpack_database::{DesignStore, GrantStore};
use techpack_entity::share::ShareGrant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::share::token::TokenGenerator;

/// Service for issuing and rotating share grants.
///
/// A design carries at most one grant. Issuing without rotation returns
/// the live grant when one exists; rotation always mints a fresh token
/// and bumps the generation counter, which invalidates every previously
/// handed-out link for that design.
#[derive(Debug, Clone)]
pub struct ShareService {
    grant_store: Arc<dyn GrantStore>,
    design_store: Arc<dyn DesignStore>,
    token_generator: Arc<TokenGenerator>,
    policy: ShareConfig,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        grant_store: Arc<dyn GrantStore>,
        design_store: Arc<dyn DesignStore>,
        token_generator: Arc<TokenGenerator>,
        policy: ShareConfig,
    ) -> Self {
        Self {
            grant_store,
            design_store,
            token_generator,
            policy,
        }
    }

    /// Issues a share grant for a design.
    ///
    /// Without `rotate`, an existing live grant is returned unchanged so
    /// repeated calls are idempotent. With `rotate`, a new token replaces
    /// whatever was there. The TTL falls back to the configured default
    /// and is clamped to the configured maximum.
    pub async fn issue(
        &self,
        design_id: Uuid,
        ttl_minutes: Option<i64>,
        rotate: bool,
    ) -> AppResult<ShareGrant> {
        let ttl_minutes = self.resolve_ttl(ttl_minutes)?;

        if self.design_store.find_by_id(design_id).await?.is_none() {
            return Err(AppError::not_found("Design not found"));
        }

        if !rotate {
            if let Some(existing) = self.grant_store.get_live(design_id).await? {
                debug!(
                    design_id = %design_id,
                    generation = existing.generation,
                    "Reusing live share grant"
                );
                return Ok(existing);
            }
        }

        let token = self.token_generator.generate();
        let grant = self.grant_store.upsert(design_id, &token, ttl_minutes).await?;

        info!(
            design_id = %design_id,
            generation = grant.generation,
            rotated = rotate,
            expires_at = %grant.expires_at,
            "Issued share grant"
        );

        Ok(grant)
    }

    fn resolve_ttl(&self, requested: Option<i64>) -> AppResult<i64> {
        match requested {
            Some(minutes) if minutes <= 0 => {
                Err(AppError::validation("ttl_minutes must be positive"))
            }
            Some(minutes) if minutes > self.policy.max_ttl_minutes => {
                debug!(
                    requested = minutes,
                    max = self.policy.max_ttl_minutes,
                    "Clamping requested share TTL to the configured maximum"
                );
                Ok(self.policy.max_ttl_minutes)
            }
            Some(minutes) => Ok(minutes),
            None => Ok(self.policy.default_ttl_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use techpack_core::error::ErrorKind;
    use techpack_database::repositories::memory::{MemoryDesignStore, MemoryGrantStore};
    use techpack_entity::design::Design;

    use super::*;

    fn design() -> Design {
        Design {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            image_url: "https://cdn.example.com/designs/lamp.png".to_string(),
            width: Some(12.0),
            height: Some(45.0),
            depth: None,
            material: Some("Brass".to_string()),
            color: None,
            created_at: Utc::now(),
        }
    }

    fn policy() -> ShareConfig {
        ShareConfig {
            default_ttl_minutes: 10,
            max_ttl_minutes: 60,
        }
    }

    struct Setup {
        service: ShareService,
        grants: MemoryGrantStore,
        design: Design,
    }

    async fn setup() -> Setup {
        let grants = MemoryGrantStore::new();
        let designs = MemoryDesignStore::new();
        let design = design();
        designs.insert(design.clone()).await;
        let service = ShareService::new(
            Arc::new(grants.clone()),
            Arc::new(designs),
            Arc::new(TokenGenerator::new()),
            policy(),
        );
        Setup {
            service,
            grants,
            design,
        }
    }

    #[tokio::test]
    async fn issue_without_rotation_is_idempotent() {
        let s = setup().await;

        let first = s.service.issue(s.design.id, None, false).await.unwrap();
        let second = s.service.issue(s.design.id, None, false).await.unwrap();

        assert_eq!(first.token, second.token);
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 1);
    }

    #[tokio::test]
    async fn rotation_mints_a_new_token_and_bumps_generation() {
        let s = setup().await;

        let first = s.service.issue(s.design.id, None, false).await.unwrap();
        let rotated = s.service.issue(s.design.id, None, true).await.unwrap();

        assert_ne!(first.token, rotated.token);
        assert_eq!(rotated.generation, 2);
    }

    #[tokio::test]
    async fn rotating_with_no_prior_grant_starts_at_generation_one() {
        let s = setup().await;

        let grant = s.service.issue(s.design.id, None, true).await.unwrap();
        assert_eq!(grant.generation, 1);
    }

    #[tokio::test]
    async fn unknown_design_is_rejected() {
        let s = setup().await;

        let err = s.service.issue(Uuid::new_v4(), None, false).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn non_positive_ttl_is_rejected() {
        let s = setup().await;

        let err = s.service.issue(s.design.id, Some(0), false).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = s.service.issue(s.design.id, Some(-5), false).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn oversized_ttl_is_clamped_to_the_maximum() {
        let s = setup().await;

        let grant = s.service.issue(s.design.id, Some(10_000), false).await.unwrap();
        let lifetime = grant.expires_at - grant.issued_at;
        assert_eq!(lifetime, Duration::minutes(60));
    }

    #[tokio::test]
    async fn omitted_ttl_uses_the_default() {
        let s = setup().await;

        let grant = s.service.issue(s.design.id, None, false).await.unwrap();
        let lifetime = grant.expires_at - grant.issued_at;
        assert_eq!(lifetime, Duration::minutes(10));
    }

    #[tokio::test]
    async fn expired_grant_is_replaced_even_without_rotation() {
        let s = setup().await;

        let now = Utc::now();
        s.grants
            .insert(ShareGrant {
                design_id: s.design.id,
                token: "stale-token".to_string(),
                generation: 1,
                issued_at: now - Duration::minutes(120),
                expires_at: now - Duration::minutes(60),
            })
            .await;

        let grant = s.service.issue(s.design.id, None, false).await.unwrap();
        assert_ne!(grant.token, "stale-token");
        assert_eq!(grant.generation, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_rotations_leave_one_live_winner() {
        let s = setup().await;
        let service = Arc::new(s.service);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            let design_id = s.design.id;
            handles.push(tokio::spawn(async move {
                service.issue(design_id, None, true).await
            }));
        }

        let mut tokens = Vec::new();
        for handle in handles {
            let grant = handle.await.unwrap().unwrap();
            tokens.push(grant.token);
        }

        let live = s.grants.get_live(s.design.id).await.unwrap().unwrap();
        assert_eq!(live.generation, 8);
        assert_eq!(tokens.iter().filter(|t| **t == live.token).count(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_creates_converge_on_one_live_token() {
        let s = setup().await;
        let service = Arc::new(s.service);

        let a = {
            let service = Arc::clone(&service);
            let design_id = s.design.id;
            tokio::spawn(async move { service.issue(design_id, None, false).await })
        };
        let b = {
            let service = Arc::clone(&service);
            let design_id = s.design.id;
            tokio::spawn(async move { service.issue(design_id, None, false).await })
        };

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();

        let live = s.grants.get_live(s.design.id).await.unwrap().unwrap();
        assert!(live.token == a.token || live.token == b.token);
        // Worst case both callers miss the reuse check and upsert.
        assert!(live.generation <= 2);
    }
}
