//! Warden Effects - handlers for the effect traits in `warden-core`
//!
//! - [`MemoryPolicyState`]: per-account policy snapshots held in memory
//! - [`StaticOrganizationDirectory`]: organization table keyed by user
//!
//! Failure-injecting doubles belong in `warden-testkit`, not here.

#![forbid(unsafe_code)]

pub mod directory;
pub mod state;

pub use directory::StaticOrganizationDirectory;
pub use state::MemoryPolicyState;
