//! Ready-made collaborator sets for policy service tests

use crate::builders::policy_map;
use crate::recording::RecordingPolicyState;
use warden_core::effects::{
    account_unlock_channel, AccountUnlockHandle, AccountUnlockSignal, PolicyStateEffects,
};
use warden_core::{Organization, PolicyData, UserId, WardenResult};
use warden_effects::{MemoryPolicyState, StaticOrganizationDirectory};

/// Collaborators of one signed-in account.
///
/// The account starts locked. Tests unlock it through [`Self::unlock`].
#[derive(Debug)]
pub struct PolicyFixture {
    /// The active account
    pub user_id: UserId,
    /// Persistence, journaling and failing on demand
    pub state: RecordingPolicyState,
    /// Organization table of the active account
    pub directory: StaticOrganizationDirectory,
    /// Sender for the account lock state
    pub unlock: AccountUnlockHandle,
    signal: AccountUnlockSignal,
}

impl PolicyFixture {
    /// Create collaborators for `user_id` with no organizations or policies
    pub fn new(user_id: impl Into<UserId>) -> Self {
        let user_id = user_id.into();
        let state =
            RecordingPolicyState::new(MemoryPolicyState::with_active_user(user_id.clone()));
        let directory = StaticOrganizationDirectory::new(user_id.clone());
        let (unlock, signal) = account_unlock_channel(false);
        Self {
            user_id,
            state,
            directory,
            unlock,
            signal,
        }
    }

    /// Set the active account's organizations
    pub fn with_organizations(self, organizations: Vec<Organization>) -> Self {
        self.directory
            .set_organizations(self.user_id.clone(), organizations);
        self
    }

    /// A receiver for the lock state
    pub fn unlock_signal(&self) -> AccountUnlockSignal {
        self.signal.clone()
    }

    /// Write records straight into the active account's encrypted snapshot,
    /// bypassing any service and without journaling
    pub async fn seed_encrypted<I>(&self, records: I) -> WardenResult<()>
    where
        I: IntoIterator<Item = PolicyData>,
    {
        self.state
            .inner()
            .set_encrypted_policies(Some(policy_map(records)), None)
            .await
    }
}
