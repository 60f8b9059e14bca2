//! Master password policy merge
//!
//! Folds every contributing master password policy into one effective
//! constraint record. The fold is built from `max` and `||` only, so it is
//! commutative, associative and only ever tightens.

use warden_core::{MasterPasswordPolicyOptions, Policy, PolicyPayload, PolicyType};

/// Payload field names of a master password policy
pub mod fields {
    /// Minimum strength score
    pub const MIN_COMPLEXITY: &str = "minComplexity";
    /// Minimum length
    pub const MIN_LENGTH: &str = "minLength";
    /// Require an uppercase character
    pub const REQUIRE_UPPER: &str = "requireUpper";
    /// Require a lowercase character
    pub const REQUIRE_LOWER: &str = "requireLower";
    /// Require a digit
    pub const REQUIRE_NUMBERS: &str = "requireNumbers";
    /// Require a special character
    pub const REQUIRE_SPECIAL: &str = "requireSpecial";
    /// Check at login
    pub const ENFORCE_ON_LOGIN: &str = "enforceOnLogin";
}

/// Constraints carried by a single payload. Missing or malformed fields
/// contribute nothing.
pub fn options_from_payload(data: &PolicyPayload) -> MasterPasswordPolicyOptions {
    MasterPasswordPolicyOptions {
        min_complexity: data.u32_field(fields::MIN_COMPLEXITY).unwrap_or(0),
        min_length: data.u32_field(fields::MIN_LENGTH).unwrap_or(0),
        require_upper: data.flag(fields::REQUIRE_UPPER),
        require_lower: data.flag(fields::REQUIRE_LOWER),
        require_numbers: data.flag(fields::REQUIRE_NUMBERS),
        require_special: data.flag(fields::REQUIRE_SPECIAL),
        enforce_on_login: data.flag(fields::ENFORCE_ON_LOGIN),
    }
}

/// Merge all enabled master password policies that carry data.
///
/// Returns `None` when nothing contributes. Eligibility is not consulted;
/// pass only the policies that bind the user if that matters.
pub fn merge_master_password_policies<'a, I>(policies: I) -> Option<MasterPasswordPolicyOptions>
where
    I: IntoIterator<Item = &'a Policy>,
{
    policies
        .into_iter()
        .filter(|policy| policy.is_enabled_of(PolicyType::MasterPassword))
        .filter_map(|policy| policy.data.as_ref())
        .map(options_from_payload)
        .fold(None, |merged: Option<MasterPasswordPolicyOptions>, next| {
            Some(merged.map_or(next, |current| current.join(&next)))
        })
}
