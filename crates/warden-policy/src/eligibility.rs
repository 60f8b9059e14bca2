//! Policy eligibility
//!
//! Decides whether a policy currently binds the active user, given the
//! user's membership in the policy's organization.
//!
//! A policy binds when all of the following hold:
//!
//! 1. the membership status is at least `Accepted`
//! 2. the organization uses policies
//! 3. the user is not exempt from that policy type
//!
//! Exemption depends on the policy type. `MaximumVaultTimeout` applies to
//! everyone except owners. Every other type exempts users who can manage
//! policies in the organization.

use crate::filter::{self, PolicyFilter};
use warden_core::{Organization, Policy, PolicyType};

/// Whether the user is exempt from policies of this type in the organization
pub fn is_exempt(policy_type: PolicyType, organization: &Organization) -> bool {
    match policy_type {
        PolicyType::MaximumVaultTimeout => organization.is_owner(),
        _ => organization.can_manage_policies,
    }
}

/// Whether `policy` binds the user through `organization`.
///
/// Pairing the policy with its own organization is the caller's job; this
/// only looks at membership and exemption.
pub fn binds(policy: &Policy, organization: &Organization) -> bool {
    if !organization.is_accepted() || !organization.use_policies {
        return false;
    }
    !is_exempt(policy.policy_type, organization)
}

/// Whether `policy` binds the user through any of `organizations`
fn binds_in(policy: &Policy, organizations: &[Organization]) -> bool {
    organizations
        .iter()
        .any(|org| org.id == policy.organization_id && binds(policy, org))
}

/// Enabled policies of the type that pass the filter and bind the user.
///
/// Storage order is preserved.
pub fn binding_policies_of<'a>(
    policies: &'a [Policy],
    policy_type: PolicyType,
    organizations: &'a [Organization],
    filter: Option<&'a PolicyFilter>,
) -> impl Iterator<Item = &'a Policy> + 'a {
    policies.iter().filter(move |policy| {
        policy.is_enabled_of(policy_type)
            && filter::accepts(filter, policy)
            && binds_in(policy, organizations)
    })
}

/// True if at least one enabled policy of the type binds the user
pub fn applies_to_user(
    policies: &[Policy],
    policy_type: PolicyType,
    organizations: &[Organization],
    filter: Option<&PolicyFilter>,
) -> bool {
    let applies = binding_policies_of(policies, policy_type, organizations, filter)
        .next()
        .is_some();
    tracing::trace!(?policy_type, applies, "Checked policy applicability");
    applies
}

/// First enabled, binding, filter-accepted policy of the type.
///
/// Ties between organizations are broken by storage order only.
pub fn first_binding_policy<'a>(
    policies: &'a [Policy],
    policy_type: PolicyType,
    organizations: &'a [Organization],
    filter: Option<&'a PolicyFilter>,
) -> Option<&'a Policy> {
    binding_policies_of(policies, policy_type, organizations, filter).next()
}

/// Every policy, of any type, that binds the user.
///
/// Policies whose organization is not in `organizations` never bind. The
/// enabled flag is not checked; type lookups drop disabled policies.
pub fn enforced_policies<'a>(
    policies: &'a [Policy],
    organizations: &'a [Organization],
) -> impl Iterator<Item = &'a Policy> + 'a {
    policies
        .iter()
        .filter(move |policy| binds_in(policy, organizations))
}
