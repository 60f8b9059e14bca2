//! Effective constraint records derived from policies

use serde::{Deserialize, Serialize};

/// Effective master password constraints.
///
/// Callers hold this as `Option<MasterPasswordPolicyOptions>`: `None` means no
/// master password policy is in force, while `Some(Default::default())` means
/// a policy is present but does not constrain anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterPasswordPolicyOptions {
    /// Minimum password strength score
    pub min_complexity: u32,
    /// Minimum password length
    pub min_length: u32,
    /// At least one uppercase character
    pub require_upper: bool,
    /// At least one lowercase character
    pub require_lower: bool,
    /// At least one ASCII digit
    pub require_numbers: bool,
    /// At least one of `!@#$%^&*`
    pub require_special: bool,
    /// Check the existing password at login
    pub enforce_on_login: bool,
}

impl MasterPasswordPolicyOptions {
    /// Strictest-wins combination of two constraint records.
    ///
    /// Numeric minimums take the max, requirements take the OR, so the result
    /// is never weaker than either input.
    pub fn join(&self, other: &Self) -> Self {
        Self {
            min_complexity: self.min_complexity.max(other.min_complexity),
            min_length: self.min_length.max(other.min_length),
            require_upper: self.require_upper || other.require_upper,
            require_lower: self.require_lower || other.require_lower,
            require_numbers: self.require_numbers || other.require_numbers,
            require_special: self.require_special || other.require_special,
            enforce_on_login: self.enforce_on_login || other.enforce_on_login,
        }
    }

    /// True if `self` is at least as strict as `other` on every field
    pub fn is_at_least(&self, other: &Self) -> bool {
        self.join(other) == *self
    }
}

/// Organization-administered password reset settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPolicyOptions {
    /// Members are enrolled in password reset automatically
    pub auto_enroll_enabled: bool,
}
