//! Master password evaluation
//!
//! Checks a candidate master password and its strength score against the
//! merged constraints. Pure and infallible: absent constraints accept.
//! Nothing here logs; callers decide what a rejection is worth reporting.

use serde::{Deserialize, Serialize};
use warden_core::MasterPasswordPolicyOptions;

/// Characters that satisfy the special character requirement
pub const SPECIAL_CHARACTERS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// A single constraint the candidate failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRequirement {
    /// Strength score below the minimum
    MinComplexity(u32),
    /// Shorter than the minimum, in UTF-16 code units
    MinLength(u32),
    /// No uppercase character
    Uppercase,
    /// No lowercase character
    Lowercase,
    /// No ASCII digit
    Number,
    /// None of [`SPECIAL_CHARACTERS`]
    Special,
}

/// Every constraint the candidate fails, in a fixed order.
///
/// Length is counted in UTF-16 code units, so a character outside the Basic
/// Multilingual Plane counts twice.
pub fn unmet_requirements(
    strength_score: u32,
    password: &str,
    options: Option<&MasterPasswordPolicyOptions>,
) -> Vec<PasswordRequirement> {
    let Some(options) = options else {
        return Vec::new();
    };

    let mut unmet = Vec::new();

    if options.min_complexity > 0 && strength_score < options.min_complexity {
        unmet.push(PasswordRequirement::MinComplexity(options.min_complexity));
    }

    let length = password.encode_utf16().count() as u64;
    if options.min_length > 0 && length < u64::from(options.min_length) {
        unmet.push(PasswordRequirement::MinLength(options.min_length));
    }

    // Case checks compare against a case fold, so caseless scripts fail both
    if options.require_upper && password.to_lowercase() == password {
        unmet.push(PasswordRequirement::Uppercase);
    }

    if options.require_lower && password.to_uppercase() == password {
        unmet.push(PasswordRequirement::Lowercase);
    }

    if options.require_numbers && !password.chars().any(|c| c.is_ascii_digit()) {
        unmet.push(PasswordRequirement::Number);
    }

    if options.require_special && !password.contains(SPECIAL_CHARACTERS) {
        unmet.push(PasswordRequirement::Special);
    }

    unmet
}

/// Whether the candidate satisfies every constraint
pub fn evaluate_master_password(
    strength_score: u32,
    password: &str,
    options: Option<&MasterPasswordPolicyOptions>,
) -> bool {
    unmet_requirements(strength_score, password, options).is_empty()
}
