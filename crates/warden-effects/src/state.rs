//! In-memory policy state handler

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use warden_core::effects::PolicyStateEffects;
use warden_core::{Policy, PolicyDataMap, UserId, WardenError, WardenResult};

#[derive(Debug, Default, Clone)]
struct AccountSnapshots {
    encrypted: Option<PolicyDataMap>,
    decrypted: Option<Vec<Policy>>,
}

#[derive(Debug, Default)]
struct StateInner {
    active_user: Option<UserId>,
    accounts: HashMap<UserId, AccountSnapshots>,
}

impl StateInner {
    fn resolve(&self, user_id: Option<&UserId>) -> Option<UserId> {
        user_id.cloned().or_else(|| self.active_user.clone())
    }

    fn account_mut(&mut self, user_id: Option<&UserId>) -> WardenResult<&mut AccountSnapshots> {
        let user = self
            .resolve(user_id)
            .ok_or_else(|| WardenError::not_found("No active account for policy state"))?;
        Ok(self.accounts.entry(user).or_default())
    }

    fn account(&self, user_id: Option<&UserId>) -> Option<&AccountSnapshots> {
        let user = self.resolve(user_id)?;
        self.accounts.get(&user)
    }
}

/// Per-account policy snapshots held in memory.
///
/// Writes addressed to "the active account" fail with `NotFound` when no
/// account is active; reads return `None`.
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicyState {
    inner: Arc<RwLock<StateInner>>,
}

impl MemoryPolicyState {
    /// Create an empty handler with no active account
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty handler with `user_id` active
    pub fn with_active_user(user_id: UserId) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StateInner {
                active_user: Some(user_id),
                accounts: HashMap::new(),
            })),
        }
    }

    /// Switch the active account
    pub async fn set_active_user(&self, user_id: Option<UserId>) {
        self.inner.write().await.active_user = user_id;
    }

    /// Drop every snapshot of every account
    pub async fn clear_all(&self) {
        self.inner.write().await.accounts.clear();
    }
}

#[async_trait]
impl PolicyStateEffects for MemoryPolicyState {
    async fn encrypted_policies(
        &self,
        user_id: Option<&UserId>,
    ) -> WardenResult<Option<PolicyDataMap>> {
        let inner = self.inner.read().await;
        Ok(inner.account(user_id).and_then(|a| a.encrypted.clone()))
    }

    async fn set_encrypted_policies(
        &self,
        policies: Option<PolicyDataMap>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()> {
        let count = policies.as_ref().map(PolicyDataMap::len);
        let mut inner = self.inner.write().await;
        inner.account_mut(user_id)?.encrypted = policies;
        tracing::trace!(?count, "Stored encrypted policy snapshot");
        Ok(())
    }

    async fn decrypted_policies(&self, user_id: Option<&UserId>) -> WardenResult<Option<Vec<Policy>>> {
        let inner = self.inner.read().await;
        Ok(inner.account(user_id).and_then(|a| a.decrypted.clone()))
    }

    async fn set_decrypted_policies(
        &self,
        policies: Option<Vec<Policy>>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()> {
        let mut inner = self.inner.write().await;
        inner.account_mut(user_id)?.decrypted = policies;
        Ok(())
    }

    async fn active_user_id(&self) -> WardenResult<Option<UserId>> {
        Ok(self.inner.read().await.active_user.clone())
    }
}
