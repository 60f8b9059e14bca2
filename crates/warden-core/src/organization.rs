//! Organization membership snapshots
//!
//! Organizations are owned by the external directory. The policy layer only
//! reads these snapshots.

use crate::identifiers::OrganizationId;
use serde::{Deserialize, Serialize};

/// Role of the user inside an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrganizationUserType {
    /// Organization owner
    Owner,
    /// Administrator
    Admin,
    /// Regular member
    User,
    /// Collection manager
    Manager,
    /// Custom permission set
    Custom,
}

impl TryFrom<u8> for OrganizationUserType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Owner),
            1 => Ok(Self::Admin),
            2 => Ok(Self::User),
            3 => Ok(Self::Manager),
            4 => Ok(Self::Custom),
            other => Err(format!("unknown organization user type {other}")),
        }
    }
}

impl From<OrganizationUserType> for u8 {
    fn from(role: OrganizationUserType) -> Self {
        match role {
            OrganizationUserType::Owner => 0,
            OrganizationUserType::Admin => 1,
            OrganizationUserType::User => 2,
            OrganizationUserType::Manager => 3,
            OrganizationUserType::Custom => 4,
        }
    }
}

/// Membership status of the user in an organization.
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// the wire codes: `Revoked < Invited < Accepted < Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum OrganizationUserStatus {
    /// Access revoked by an administrator
    Revoked,
    /// Invited, not yet accepted
    Invited,
    /// Invitation accepted, awaiting confirmation
    Accepted,
    /// Full member
    Confirmed,
}

impl TryFrom<i8> for OrganizationUserStatus {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(Self::Revoked),
            0 => Ok(Self::Invited),
            1 => Ok(Self::Accepted),
            2 => Ok(Self::Confirmed),
            other => Err(format!("unknown organization user status {other}")),
        }
    }
}

impl From<OrganizationUserStatus> for i8 {
    fn from(status: OrganizationUserStatus) -> Self {
        match status {
            OrganizationUserStatus::Revoked => -1,
            OrganizationUserStatus::Invited => 0,
            OrganizationUserStatus::Accepted => 1,
            OrganizationUserStatus::Confirmed => 2,
        }
    }
}

/// The active user's view of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Organization id
    pub id: OrganizationId,
    /// The user's role
    #[serde(rename = "type")]
    pub role: OrganizationUserType,
    /// The user's membership status
    pub status: OrganizationUserStatus,
    /// Whether the organization uses policies at all
    pub use_policies: bool,
    /// Whether the user may manage policies in this organization
    pub can_manage_policies: bool,
}

impl Organization {
    /// True if the user owns the organization
    pub fn is_owner(&self) -> bool {
        self.role == OrganizationUserType::Owner
    }

    /// True once the user has at least accepted the invitation
    pub fn is_accepted(&self) -> bool {
        self.status >= OrganizationUserStatus::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_matches_wire_codes() {
        use OrganizationUserStatus::*;
        assert!(Revoked < Invited);
        assert!(Invited < Accepted);
        assert!(Accepted < Confirmed);
        assert_eq!(i8::from(Revoked), -1);
    }

    #[test]
    fn test_organization_json_shape() {
        let org: Organization = serde_json::from_str(
            r#"{"id":"o1","type":0,"status":2,"usePolicies":true,"canManagePolicies":false}"#,
        )
        .unwrap();
        assert!(org.is_owner());
        assert!(org.is_accepted());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_str::<OrganizationUserStatus>("7");
        assert!(result.is_err());
    }
}
