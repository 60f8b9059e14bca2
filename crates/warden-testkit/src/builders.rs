//! Builders for policies and organizations

use serde_json::Value;
use warden_core::{
    Organization, OrganizationId, OrganizationUserStatus, OrganizationUserType, Policy,
    PolicyData, PolicyDataMap, PolicyId, PolicyPayload, PolicyType,
};

/// Builder for [`Policy`] and [`PolicyData`]
///
/// Defaults to an enabled policy without payload.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    id: PolicyId,
    organization_id: OrganizationId,
    policy_type: PolicyType,
    enabled: bool,
    data: Option<PolicyPayload>,
}

impl PolicyBuilder {
    /// Start a policy of `policy_type` owned by `organization_id`
    pub fn new(
        id: impl Into<PolicyId>,
        organization_id: impl Into<OrganizationId>,
        policy_type: PolicyType,
    ) -> Self {
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            policy_type,
            enabled: true,
            data: None,
        }
    }

    /// Master password policy shortcut
    pub fn master_password(
        id: impl Into<PolicyId>,
        organization_id: impl Into<OrganizationId>,
    ) -> Self {
        Self::new(id, organization_id, PolicyType::MasterPassword)
    }

    /// Reset password policy shortcut
    pub fn reset_password(
        id: impl Into<PolicyId>,
        organization_id: impl Into<OrganizationId>,
    ) -> Self {
        Self::new(id, organization_id, PolicyType::ResetPassword)
    }

    /// Set the enabled flag
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replace the payload
    pub fn data(mut self, data: PolicyPayload) -> Self {
        self.data = Some(data);
        self
    }

    /// Add one payload field, creating the payload if needed
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        let data = self.data.take().unwrap_or_default();
        self.data = Some(data.with(key, value));
        self
    }

    /// Build the domain value
    pub fn build(self) -> Policy {
        self.build_data().into()
    }

    /// Build the persisted record
    pub fn build_data(self) -> PolicyData {
        PolicyData {
            id: self.id,
            organization_id: self.organization_id,
            policy_type: self.policy_type,
            enabled: self.enabled,
            data: self.data,
        }
    }
}

/// Key records by id, in the given order
pub fn policy_map<I>(records: I) -> PolicyDataMap
where
    I: IntoIterator<Item = PolicyData>,
{
    records
        .into_iter()
        .map(|record| (record.id.clone(), record))
        .collect()
}

/// Builder for [`Organization`]
///
/// Defaults to a confirmed regular member of an organization that uses
/// policies.
#[derive(Debug, Clone)]
pub struct OrganizationBuilder {
    organization: Organization,
}

impl OrganizationBuilder {
    /// Start an organization with the given id
    pub fn new(id: impl Into<OrganizationId>) -> Self {
        Self {
            organization: Organization {
                id: id.into(),
                role: OrganizationUserType::User,
                status: OrganizationUserStatus::Confirmed,
                use_policies: true,
                can_manage_policies: false,
            },
        }
    }

    /// Set the user's role
    pub fn role(mut self, role: OrganizationUserType) -> Self {
        self.organization.role = role;
        self
    }

    /// Set the membership status
    pub fn status(mut self, status: OrganizationUserStatus) -> Self {
        self.organization.status = status;
        self
    }

    /// Set whether the organization uses policies
    pub fn use_policies(mut self, use_policies: bool) -> Self {
        self.organization.use_policies = use_policies;
        self
    }

    /// Set whether the user may manage policies
    pub fn can_manage_policies(mut self, can_manage: bool) -> Self {
        self.organization.can_manage_policies = can_manage;
        self
    }

    /// Owner who can manage policies
    pub fn owner(id: impl Into<OrganizationId>) -> Self {
        Self::new(id)
            .role(OrganizationUserType::Owner)
            .can_manage_policies(true)
    }

    /// Finish
    pub fn build(self) -> Organization {
        self.organization
    }
}
