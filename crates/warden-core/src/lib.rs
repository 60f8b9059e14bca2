//! Warden Core - policy domain types and effect interfaces
//!
//! This crate holds everything the other Warden crates agree on:
//!
//! - [`Policy`] and its persisted form [`PolicyData`]
//! - [`Organization`] membership snapshots read from the directory
//! - [`MasterPasswordPolicyOptions`] and [`ResetPasswordPolicyOptions`]
//! - the unified [`WardenError`]
//! - effect traits for persistence, the organization directory and the
//!   account lock signal
//! - the [`WardenConfig`] loading trait
//!
//! It contains no policy logic. Evaluation lives in `warden-policy` and the
//! observable store in `warden-service`.

#![forbid(unsafe_code)]

pub mod config;
pub mod effects;
pub mod errors;
pub mod identifiers;
pub mod options;
pub mod organization;
pub mod policy;

pub use config::WardenConfig;
pub use errors::{WardenError, WardenResult};
pub use identifiers::{OrganizationId, PolicyId, UserId};
pub use options::{MasterPasswordPolicyOptions, ResetPasswordPolicyOptions};
pub use organization::{Organization, OrganizationUserStatus, OrganizationUserType};
pub use policy::{policies_from_map, Policy, PolicyData, PolicyDataMap, PolicyPayload, PolicyType};
