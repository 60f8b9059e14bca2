//! Policy persistence effect.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `warden-effects` (`MemoryPolicyState`)
//! - **Usage**: `warden-service` persists and reloads the policy snapshots
//!
//! Two snapshots are kept per user. The encrypted snapshot is the source of
//! truth, a map of persisted records keyed by policy id. The decrypted
//! snapshot is a cache of decoded policies that is reset to `None` whenever
//! the encrypted snapshot changes.
//!
//! Every method takes an optional user. `None` addresses the active account.

use crate::identifiers::UserId;
use crate::policy::{Policy, PolicyDataMap};
use crate::WardenResult;
use async_trait::async_trait;

/// Key-value persistence contract for policy snapshots
#[async_trait]
pub trait PolicyStateEffects: Send + Sync {
    /// Read the encrypted snapshot
    async fn encrypted_policies(&self, user_id: Option<&UserId>)
        -> WardenResult<Option<PolicyDataMap>>;

    /// Write or clear the encrypted snapshot
    async fn set_encrypted_policies(
        &self,
        policies: Option<PolicyDataMap>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()>;

    /// Read the decrypted cache
    async fn decrypted_policies(&self, user_id: Option<&UserId>) -> WardenResult<Option<Vec<Policy>>>;

    /// Write or invalidate the decrypted cache
    async fn set_decrypted_policies(
        &self,
        policies: Option<Vec<Policy>>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()>;

    /// Id of the active account, if one is signed in
    async fn active_user_id(&self) -> WardenResult<Option<UserId>>;
}

/// Blanket implementation for Arc<T> where T: PolicyStateEffects
#[async_trait]
impl<T: PolicyStateEffects + ?Sized> PolicyStateEffects for std::sync::Arc<T> {
    async fn encrypted_policies(
        &self,
        user_id: Option<&UserId>,
    ) -> WardenResult<Option<PolicyDataMap>> {
        (**self).encrypted_policies(user_id).await
    }

    async fn set_encrypted_policies(
        &self,
        policies: Option<PolicyDataMap>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()> {
        (**self).set_encrypted_policies(policies, user_id).await
    }

    async fn decrypted_policies(&self, user_id: Option<&UserId>) -> WardenResult<Option<Vec<Policy>>> {
        (**self).decrypted_policies(user_id).await
    }

    async fn set_decrypted_policies(
        &self,
        policies: Option<Vec<Policy>>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()> {
        (**self).set_decrypted_policies(policies, user_id).await
    }

    async fn active_user_id(&self) -> WardenResult<Option<UserId>> {
        (**self).active_user_id().await
    }
}
