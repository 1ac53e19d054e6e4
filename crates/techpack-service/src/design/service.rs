//! Owner-facing design access.

use std::sync::Arc;

use techpack_core::{AppError, AppResult};
use techpack_database::DesignStore;
use techpack_entity::design::Design;
use tracing::debug;
use uuid::Uuid;

use crate::context::RequestContext;

/// Service for loading designs on behalf of their owner.
#[derive(Debug, Clone)]
pub struct DesignService {
    design_store: Arc<dyn DesignStore>,
}

impl DesignService {
    /// Creates a new design service.
    pub fn new(design_store: Arc<dyn DesignStore>) -> Self {
        Self { design_store }
    }

    /// Loads a design and verifies the caller owns it.
    ///
    /// Returns `NotFound` when the design does not exist and `Forbidden`
    /// when it belongs to someone else.
    pub async fn get_owned(&self, ctx: &RequestContext, design_id: Uuid) -> AppResult<Design> {
        let design = self
            .design_store
            .find_by_id(design_id)
            .await?
            .ok_or_else(|| AppError::not_found("Design not found"))?;

        if design.owner_id != ctx.user_id {
            debug!(
                design_id = %design_id,
                owner_id = %design.owner_id,
                user_id = %ctx.user_id,
                "Rejected access to a design owned by another user"
            );
            return Err(AppError::forbidden("You do not own this design"));
        }

        Ok(design)
    }
}
