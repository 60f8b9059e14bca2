//! Policy documents
//!
//! [`PolicyData`] is the persisted record kept in the encrypted snapshot map.
//! [`Policy`] is the immutable domain value built from it. Policies are never
//! mutated in place; a refresh replaces the whole set.

use crate::identifiers::{OrganizationId, PolicyId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of organization policy, serialized as its numeric wire code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PolicyType {
    /// Require two-step login for members
    TwoFactorAuthentication,
    /// Master password strength requirements
    MasterPassword,
    /// Password generator constraints
    PasswordGenerator,
    /// Members may not join other organizations
    SingleOrg,
    /// Require SSO login
    RequireSso,
    /// Items must be owned by the organization
    PersonalOwnership,
    /// Disable Send
    DisableSend,
    /// Send options
    SendOptions,
    /// Organization-administered master password reset
    ResetPassword,
    /// Upper bound on the vault timeout
    MaximumVaultTimeout,
    /// Disable export of the personal vault
    DisablePersonalVaultExport,
    /// Turn on autofill on page load
    ActivateAutofill,
    /// A code this client does not know; kept so it round-trips unchanged
    Unknown(u8),
}

impl PolicyType {
    /// Numeric wire code
    pub fn code(self) -> u8 {
        match self {
            Self::TwoFactorAuthentication => 0,
            Self::MasterPassword => 1,
            Self::PasswordGenerator => 2,
            Self::SingleOrg => 3,
            Self::RequireSso => 4,
            Self::PersonalOwnership => 5,
            Self::DisableSend => 6,
            Self::SendOptions => 7,
            Self::ResetPassword => 8,
            Self::MaximumVaultTimeout => 9,
            Self::DisablePersonalVaultExport => 10,
            Self::ActivateAutofill => 11,
            Self::Unknown(code) => code,
        }
    }
}

impl From<u8> for PolicyType {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::TwoFactorAuthentication,
            1 => Self::MasterPassword,
            2 => Self::PasswordGenerator,
            3 => Self::SingleOrg,
            4 => Self::RequireSso,
            5 => Self::PersonalOwnership,
            6 => Self::DisableSend,
            7 => Self::SendOptions,
            8 => Self::ResetPassword,
            9 => Self::MaximumVaultTimeout,
            10 => Self::DisablePersonalVaultExport,
            11 => Self::ActivateAutofill,
            other => Self::Unknown(other),
        }
    }
}

impl From<PolicyType> for u8 {
    fn from(policy_type: PolicyType) -> Self {
        policy_type.code()
    }
}

/// Type-specific policy payload.
///
/// The payload is an opaque JSON object. Accessors return `None` for fields
/// that are missing or carry the wrong JSON type, so malformed data simply
/// does not contribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyPayload(Map<String, Value>);

impl PolicyPayload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, mostly useful for tests and fixtures
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Non-negative integer field that fits in `u32`
    pub fn u32_field(&self, key: &str) -> Option<u32> {
        self.0
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    /// Boolean field
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Boolean field, missing or malformed reads as `false`
    pub fn flag(&self, key: &str) -> bool {
        self.bool_field(key).unwrap_or(false)
    }

    /// True if the payload carries no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for PolicyPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Persisted policy record, as held in the encrypted snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyData {
    /// Policy id, also the key in [`PolicyDataMap`]
    pub id: PolicyId,
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Policy kind
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    /// Whether the organization has switched the policy on
    pub enabled: bool,
    /// Type-specific payload
    #[serde(default)]
    pub data: Option<PolicyPayload>,
}

/// Encrypted snapshot map, keyed by policy id in storage order
pub type PolicyDataMap = IndexMap<PolicyId, PolicyData>;

/// An organization policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Policy id
    pub id: PolicyId,
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Policy kind
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    /// Whether the organization has switched the policy on
    pub enabled: bool,
    /// Type-specific payload
    #[serde(default)]
    pub data: Option<PolicyPayload>,
}

impl Policy {
    /// True if this is an enabled policy of the given type
    pub fn is_enabled_of(&self, policy_type: PolicyType) -> bool {
        self.enabled && self.policy_type == policy_type
    }
}

impl From<PolicyData> for Policy {
    fn from(data: PolicyData) -> Self {
        Self {
            id: data.id,
            organization_id: data.organization_id,
            policy_type: data.policy_type,
            enabled: data.enabled,
            data: data.data,
        }
    }
}

impl From<&PolicyData> for Policy {
    fn from(data: &PolicyData) -> Self {
        Self::from(data.clone())
    }
}

impl From<Policy> for PolicyData {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id,
            organization_id: policy.organization_id,
            policy_type: policy.policy_type,
            enabled: policy.enabled,
            data: policy.data,
        }
    }
}

/// Decode every record of a snapshot map into policies, in storage order
pub fn policies_from_map(map: &PolicyDataMap) -> Vec<Policy> {
    map.values().map(Policy::from).collect()
}
