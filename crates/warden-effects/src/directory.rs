//! Organization directory backed by a fixed table
//!
//! Stands in for the real directory in embedders that already hold the
//! organization list, and in tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use warden_core::effects::OrganizationDirectory;
use warden_core::{Organization, OrganizationId, UserId, WardenResult};

#[derive(Debug, Default)]
struct DirectoryInner {
    active_user: Option<UserId>,
    organizations: HashMap<UserId, Vec<Organization>>,
}

/// Organization table keyed by user
#[derive(Debug, Clone, Default)]
pub struct StaticOrganizationDirectory {
    inner: Arc<RwLock<DirectoryInner>>,
}

impl StaticOrganizationDirectory {
    /// Create an empty directory with `active_user` signed in
    pub fn new(active_user: UserId) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DirectoryInner {
                active_user: Some(active_user),
                organizations: HashMap::new(),
            })),
        }
    }

    /// Builder-style [`Self::set_organizations`]
    pub fn with_organizations(self, user_id: UserId, organizations: Vec<Organization>) -> Self {
        self.set_organizations(user_id, organizations);
        self
    }

    /// Replace the organizations of one user
    pub fn set_organizations(&self, user_id: UserId, organizations: Vec<Organization>) {
        self.inner.write().organizations.insert(user_id, organizations);
    }

    /// Switch the active account
    pub fn set_active_user(&self, user_id: Option<UserId>) {
        self.inner.write().active_user = user_id;
    }
}

#[async_trait]
impl OrganizationDirectory for StaticOrganizationDirectory {
    async fn organizations(&self, user_id: Option<&UserId>) -> WardenResult<Vec<Organization>> {
        let inner = self.inner.read();
        let user = user_id.or(inner.active_user.as_ref());
        Ok(user
            .and_then(|u| inner.organizations.get(u))
            .cloned()
            .unwrap_or_default())
    }

    async fn organization(&self, id: &OrganizationId) -> WardenResult<Option<Organization>> {
        let inner = self.inner.read();
        Ok(inner
            .active_user
            .as_ref()
            .and_then(|u| inner.organizations.get(u))
            .and_then(|orgs| orgs.iter().find(|o| o.id == *id))
            .cloned())
    }
}
