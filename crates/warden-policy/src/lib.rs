//! Warden Policy - pure policy logic
//!
//! Everything in this crate is a pure function over snapshots:
//!
//! - [`eligibility`]: whether a policy binds the user through an organization
//! - [`filter`]: named predicates narrowing policy lookups
//! - [`merge`]: strictest-wins merge of master password policies
//! - [`evaluate`]: checking a candidate master password
//! - [`reset`]: organization password reset settings
//! - [`response`]: decoding the server's policy list
//!
//! Nothing here fails on missing or malformed policy data. Absent input
//! degrades to "no constraint" or "disabled".

#![forbid(unsafe_code)]

pub mod eligibility;
pub mod evaluate;
pub mod filter;
pub mod merge;
pub mod reset;
pub mod response;

pub use eligibility::{
    applies_to_user, binding_policies_of, binds, enforced_policies, first_binding_policy,
    is_exempt,
};
pub use evaluate::{
    evaluate_master_password, unmet_requirements, PasswordRequirement, SPECIAL_CHARACTERS,
};
pub use filter::PolicyFilter;
pub use merge::{merge_master_password_policies, options_from_payload};
pub use reset::reset_password_policy_options;
pub use response::{
    decode_policy_list, policies_from_response, policy_map_from_response, ListResponse,
    PolicyResponse,
};
