//! Organization directory effect.
//!
//! # Effect Classification
//!
//! - **Category**: Application Effect
//! - **Implementation**: `warden-effects` (`StaticOrganizationDirectory`)
//! - **Usage**: eligibility checks in `warden-service`
//!
//! The directory is owned elsewhere; this is a read-only view of it.

use crate::identifiers::{OrganizationId, UserId};
use crate::organization::Organization;
use crate::WardenResult;
use async_trait::async_trait;

/// Read access to the user's organizations
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// All organizations of a user, or of the active account when `None`
    async fn organizations(&self, user_id: Option<&UserId>) -> WardenResult<Vec<Organization>>;

    /// One organization of the active account
    async fn organization(&self, id: &OrganizationId) -> WardenResult<Option<Organization>>;
}

/// Blanket implementation for Arc<T> where T: OrganizationDirectory
#[async_trait]
impl<T: OrganizationDirectory + ?Sized> OrganizationDirectory for std::sync::Arc<T> {
    async fn organizations(&self, user_id: Option<&UserId>) -> WardenResult<Vec<Organization>> {
        (**self).organizations(user_id).await
    }

    async fn organization(&self, id: &OrganizationId) -> WardenResult<Option<Organization>> {
        (**self).organization(id).await
    }
}
