//! Property test strategies for policy types
//!
//! # Example
//!
//! ```rust
//! use proptest::prelude::*;
//! use warden_testkit::strategies::arb_master_password_policy;
//!
//! proptest! {
//!     #[test]
//!     fn generated_policies_are_master_password(policy in arb_master_password_policy()) {
//!         prop_assert_eq!(policy.policy_type, warden_core::PolicyType::MasterPassword);
//!     }
//! }
//! ```

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use warden_core::{
    Organization, OrganizationId, OrganizationUserStatus, OrganizationUserType, Policy, PolicyId,
    PolicyPayload, PolicyType,
};

fn optional_field<T: std::fmt::Debug + Clone + 'static>(
    strategy: impl Strategy<Value = T> + 'static,
) -> BoxedStrategy<Option<T>> {
    prop::option::of(strategy).boxed()
}

/// Master password payloads, each field independently present or absent
pub fn arb_master_password_payload() -> impl Strategy<Value = PolicyPayload> {
    (
        optional_field(0u32..=4),
        optional_field(0u32..=128),
        optional_field(any::<bool>()),
        optional_field(any::<bool>()),
        optional_field(any::<bool>()),
        optional_field(any::<bool>()),
        optional_field(any::<bool>()),
    )
        .prop_map(|(complexity, length, upper, lower, numbers, special, login)| {
            let mut payload = PolicyPayload::new();
            if let Some(v) = complexity {
                payload = payload.with("minComplexity", v);
            }
            if let Some(v) = length {
                payload = payload.with("minLength", v);
            }
            for (key, value) in [
                ("requireUpper", upper),
                ("requireLower", lower),
                ("requireNumbers", numbers),
                ("requireSpecial", special),
                ("enforceOnLogin", login),
            ] {
                if let Some(v) = value {
                    payload = payload.with(key, v);
                }
            }
            payload
        })
}

/// Master password policies, sometimes disabled or without payload
pub fn arb_master_password_policy() -> impl Strategy<Value = Policy> {
    (
        0u32..1000,
        0u32..8,
        any::<bool>(),
        prop::option::weighted(0.9, arb_master_password_payload()),
    )
        .prop_map(|(seed, org, enabled, data)| Policy {
            id: PolicyId::new(format!("policy-{seed}")),
            organization_id: OrganizationId::new(format!("org-{org}")),
            policy_type: PolicyType::MasterPassword,
            enabled,
            data,
        })
}

/// Any organization role
pub fn arb_role() -> impl Strategy<Value = OrganizationUserType> {
    prop_oneof![
        Just(OrganizationUserType::Owner),
        Just(OrganizationUserType::Admin),
        Just(OrganizationUserType::User),
        Just(OrganizationUserType::Manager),
        Just(OrganizationUserType::Custom),
    ]
}

/// Any membership status
pub fn arb_status() -> impl Strategy<Value = OrganizationUserStatus> {
    prop_oneof![
        Just(OrganizationUserStatus::Revoked),
        Just(OrganizationUserStatus::Invited),
        Just(OrganizationUserStatus::Accepted),
        Just(OrganizationUserStatus::Confirmed),
    ]
}

/// Any policy type this client knows
pub fn arb_policy_type() -> impl Strategy<Value = PolicyType> {
    (0u8..=11).prop_map(PolicyType::from)
}

/// Organizations with arbitrary role, status and flags
pub fn arb_organization() -> impl Strategy<Value = Organization> {
    (0u32..8, arb_role(), arb_status(), any::<bool>(), any::<bool>()).prop_map(
        |(id, role, status, use_policies, can_manage_policies)| Organization {
            id: OrganizationId::new(format!("org-{id}")),
            role,
            status,
            use_policies,
            can_manage_policies,
        },
    )
}
