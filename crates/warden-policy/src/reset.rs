//! Password reset policy lookup

use warden_core::{OrganizationId, Policy, PolicyType, ResetPasswordPolicyOptions};

/// Payload field carrying the auto-enrollment flag
pub const AUTO_ENROLL_ENABLED: &str = "autoEnrollEnabled";

/// Reset settings of one organization and whether reset is enabled there.
///
/// Missing inputs or no enabled `ResetPassword` policy for the organization
/// give `(default, false)`.
pub fn reset_password_policy_options(
    policies: Option<&[Policy]>,
    organization_id: Option<&OrganizationId>,
) -> (ResetPasswordPolicyOptions, bool) {
    let (Some(policies), Some(organization_id)) = (policies, organization_id) else {
        return (ResetPasswordPolicyOptions::default(), false);
    };

    let policy = policies.iter().find(|p| {
        p.organization_id == *organization_id && p.is_enabled_of(PolicyType::ResetPassword)
    });

    match policy {
        Some(policy) => {
            let options = ResetPasswordPolicyOptions {
                auto_enroll_enabled: policy
                    .data
                    .as_ref()
                    .is_some_and(|data| data.flag(AUTO_ENROLL_ENABLED)),
            };
            (options, true)
        }
        None => (ResetPasswordPolicyOptions::default(), false),
    }
}
