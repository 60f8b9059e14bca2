//! The policy service
//!
//! Holds the in-memory policy set of the active account, keeps it in step
//! with persistence and the account lock state, and answers policy queries
//! against it.

use crate::config::PolicyServiceConfig;
use crate::publisher::{PolicyPublisher, PolicySet, PolicySubscription};
use crate::unlock::UnlockListener;
use futures::stream::{BoxStream, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use warden_core::effects::{AccountUnlockSignal, OrganizationDirectory, PolicyStateEffects};
use warden_core::{
    policies_from_map, MasterPasswordPolicyOptions, Organization, OrganizationId, Policy,
    PolicyData, PolicyDataMap, PolicyType, ResetPasswordPolicyOptions, UserId, WardenResult,
};
use warden_policy::{
    eligibility, merge_master_password_policies, unmet_requirements, PolicyFilter,
};

/// What caused a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommitReason {
    Unlock,
    Lock,
    Upsert,
    Replace,
    Clear,
}

/// Policy service over a state handler `S` and an organization directory `D`.
///
/// Mutations are serialized and hold the writer lock across persistence, so
/// commits reach subscribers in the order they happened. [`Self::current`]
/// never waits on persistence.
pub struct PolicyService<S, D> {
    state: Arc<S>,
    directory: Arc<D>,
    config: PolicyServiceConfig,
    publisher: PolicyPublisher,
    writer: Mutex<()>,
}

impl<S, D> PolicyService<S, D>
where
    S: PolicyStateEffects + 'static,
    D: OrganizationDirectory + 'static,
{
    /// Create a service with an empty policy set
    pub fn new(state: S, directory: D, config: PolicyServiceConfig) -> Self {
        Self {
            state: Arc::new(state),
            directory: Arc::new(directory),
            config,
            publisher: PolicyPublisher::new(),
            writer: Mutex::new(()),
        }
    }

    /// The configuration this service was built with
    pub fn config(&self) -> &PolicyServiceConfig {
        &self.config
    }

    /// The state handler
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The organization directory
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Snapshot of the current policy set. Empty until the first commit.
    pub fn current(&self) -> PolicySet {
        self.publisher.current()
    }

    /// Whether any commit has happened since construction
    pub fn has_loaded(&self) -> bool {
        self.publisher.commit_count() > 0
    }

    /// Subscribe to every later commit.
    ///
    /// With `replay_latest_commit` set, the latest commit (if any) is
    /// delivered first.
    pub fn subscribe(&self) -> PolicySubscription {
        self.publisher.subscribe(self.config.replay_latest_commit)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.publisher.subscriber_count()
    }

    /// Subscribe to the enforced view of every later commit.
    ///
    /// Each item is the committed set narrowed to policies binding the
    /// active user at the time the item is produced.
    pub fn subscribe_enforced(&self) -> BoxStream<'static, WardenResult<Vec<Policy>>> {
        let directory = Arc::clone(&self.directory);
        self.subscribe()
            .then(move |policies| {
                let directory = Arc::clone(&directory);
                async move { enforced_in(directory.as_ref(), &policies).await }
            })
            .boxed()
    }

    /// Policies of an account, optionally of one type.
    ///
    /// Served from the decrypted snapshot when present. Otherwise the
    /// encrypted snapshot is decoded and the result stored back as the
    /// decrypted snapshot. Does not commit.
    pub async fn load(
        &self,
        user_id: Option<&UserId>,
        policy_type: Option<PolicyType>,
    ) -> WardenResult<Vec<Policy>> {
        let _guard = self.writer.lock().await;
        let policies = self.load_locked(user_id).await?;
        Ok(match policy_type {
            Some(policy_type) => policies
                .into_iter()
                .filter(|p| p.policy_type == policy_type)
                .collect(),
            None => policies,
        })
    }

    async fn load_locked(&self, user_id: Option<&UserId>) -> WardenResult<Vec<Policy>> {
        if let Some(decrypted) = self.state.decrypted_policies(user_id).await? {
            return Ok(decrypted);
        }

        let decoded = self
            .state
            .encrypted_policies(user_id)
            .await?
            .map(|map| policies_from_map(&map))
            .unwrap_or_default();

        self.state
            .set_decrypted_policies(Some(decoded.clone()), user_id)
            .await?;
        tracing::trace!(count = decoded.len(), "Decoded encrypted policy snapshot");
        Ok(decoded)
    }

    /// Insert or replace one policy of the active account.
    ///
    /// The new set is committed before persistence, so `current()` reflects
    /// it even when a persistence error is returned.
    pub async fn upsert(&self, policy: PolicyData) -> WardenResult<()> {
        let _guard = self.writer.lock().await;

        let mut policies = self
            .state
            .encrypted_policies(None)
            .await?
            .unwrap_or_default();
        policies.insert(policy.id.clone(), policy);

        self.commit(policies_from_map(&policies), CommitReason::Upsert);
        self.persist(policies).await
    }

    /// Replace every policy of the active account
    pub async fn replace_all(&self, policies: PolicyDataMap) -> WardenResult<()> {
        let _guard = self.writer.lock().await;
        self.commit(policies_from_map(&policies), CommitReason::Replace);
        self.persist(policies).await
    }

    async fn persist(&self, policies: PolicyDataMap) -> WardenResult<()> {
        self.state.set_decrypted_policies(None, None).await?;
        self.state.set_encrypted_policies(Some(policies), None).await
    }

    /// Remove the stored policies of an account.
    ///
    /// Commits an empty set when `user_id` is absent or is the active
    /// account. Other accounts only lose their stored snapshots.
    pub async fn clear(&self, user_id: Option<&UserId>) -> WardenResult<()> {
        let _guard = self.writer.lock().await;

        let active = self.state.active_user_id().await?;
        if user_id.is_none() || user_id == active.as_ref() {
            self.commit(Vec::new(), CommitReason::Clear);
        }

        self.state.set_decrypted_policies(None, user_id).await?;
        self.state.set_encrypted_policies(None, user_id).await
    }

    /// Follow the account lock state.
    ///
    /// The current value of `signal` is applied right away. Unlocking loads
    /// the active account's policies and commits them; locking commits an
    /// empty set. The listener holds only a weak reference to the service
    /// and stops when either side goes away or the listener is dropped.
    pub fn watch_account_unlock(self: &Arc<Self>, signal: AccountUnlockSignal) -> UnlockListener {
        UnlockListener::spawn(Arc::downgrade(self), signal)
    }

    pub(crate) async fn apply_lock_state(&self, unlocked: bool) {
        let _guard = self.writer.lock().await;

        if !unlocked {
            self.commit(Vec::new(), CommitReason::Lock);
            return;
        }

        match self.load_locked(None).await {
            Ok(policies) => self.commit(policies, CommitReason::Unlock),
            Err(error) => {
                tracing::warn!(%error, "Failed to load policies after account unlock");
            }
        }
    }

    fn commit(&self, policies: Vec<Policy>, reason: CommitReason) {
        let set = self.publisher.publish(policies);
        tracing::debug!(?reason, count = set.len(), "Committed policy set");
    }

    /// Current policies that bind the active user, of any type
    pub async fn enforced_policies(&self) -> WardenResult<Vec<Policy>> {
        let policies = self.current();
        enforced_in(self.directory.as_ref(), &policies).await
    }

    /// First enabled policy of the type that binds the active user and
    /// passes `filter`
    pub async fn get(
        &self,
        policy_type: PolicyType,
        filter: Option<&PolicyFilter>,
    ) -> WardenResult<Option<Policy>> {
        let policies = self.current();
        let organizations = self.directory.organizations(None).await?;
        Ok(
            eligibility::first_binding_policy(&policies, policy_type, &organizations, filter)
                .cloned(),
        )
    }

    /// Whether a policy of the type binds the active user
    pub async fn policy_applies_to_active_user(
        &self,
        policy_type: PolicyType,
        filter: Option<&PolicyFilter>,
    ) -> WardenResult<bool> {
        let policies = self.current();
        let organizations = self.directory.organizations(None).await?;
        Ok(eligibility::applies_to_user(
            &policies,
            policy_type,
            &organizations,
            filter,
        ))
    }

    /// Whether a policy of the type binds an account, judged from that
    /// account's stored policies and organizations
    pub async fn policy_applies_to_user(
        &self,
        policy_type: PolicyType,
        filter: Option<&PolicyFilter>,
        user_id: Option<&UserId>,
    ) -> WardenResult<bool> {
        let policies = self.load(user_id, Some(policy_type)).await?;
        let organizations = self.directory.organizations(user_id).await?;
        Ok(eligibility::applies_to_user(
            &policies,
            policy_type,
            &organizations,
            filter,
        ))
    }

    /// Strictest master password requirements.
    ///
    /// Merges `policies` when given. Otherwise merges the enforced view, or
    /// every current policy when `merge_enforced_only` is off.
    pub async fn master_password_policy_options(
        &self,
        policies: Option<&[Policy]>,
    ) -> WardenResult<Option<MasterPasswordPolicyOptions>> {
        if let Some(policies) = policies {
            return Ok(merge_master_password_policies(policies));
        }

        if self.config.merge_enforced_only {
            let enforced = self.enforced_policies().await?;
            Ok(merge_master_password_policies(&enforced))
        } else {
            Ok(merge_master_password_policies(self.current().iter()))
        }
    }

    /// Check a candidate master password against the merged requirements.
    ///
    /// Uses the same input as [`Self::master_password_policy_options`] with
    /// no explicit policies. Rejections are logged with the unmet checks.
    pub async fn evaluate_master_password(
        &self,
        strength_score: u32,
        password: &str,
    ) -> WardenResult<bool> {
        let options = self.master_password_policy_options(None).await?;
        let unmet = unmet_requirements(strength_score, password, options.as_ref());
        if !unmet.is_empty() {
            tracing::debug!(?unmet, "Master password rejected by policy");
        }
        Ok(unmet.is_empty())
    }

    /// Password reset settings of an organization, from the current set
    pub fn reset_password_policy_options(
        &self,
        organization_id: Option<&OrganizationId>,
    ) -> (ResetPasswordPolicyOptions, bool) {
        let policies = self.current();
        warden_policy::reset_password_policy_options(Some(&policies[..]), organization_id)
    }
}

/// Narrow `policies` to those binding the active user, looking up each
/// distinct organization once
async fn enforced_in<D>(directory: &D, policies: &[Policy]) -> WardenResult<Vec<Policy>>
where
    D: OrganizationDirectory + ?Sized,
{
    let mut looked_up: HashSet<&OrganizationId> = HashSet::new();
    let mut organizations: Vec<Organization> = Vec::new();

    for policy in policies {
        if !looked_up.insert(&policy.organization_id) {
            continue;
        }
        if let Some(organization) = directory.organization(&policy.organization_id).await? {
            organizations.push(organization);
        }
    }

    Ok(eligibility::enforced_policies(policies, &organizations)
        .cloned()
        .collect())
}

impl<S, D> std::fmt::Debug for PolicyService<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyService")
            .field("config", &self.config)
            .field("commits", &self.publisher.commit_count())
            .field("policies", &self.publisher.current().len())
            .finish()
    }
}
