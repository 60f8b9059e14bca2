//! Warden Testing Infrastructure
//!
//! Builders, fixtures, a journaling state handler with failure injection,
//! and proptest strategies shared by the Warden crates' tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! warden-testkit = { path = "../warden-testkit" }
//! ```

pub mod builders;
pub mod fixtures;
pub mod recording;
pub mod strategies;

pub use builders::{policy_map, OrganizationBuilder, PolicyBuilder};
pub use fixtures::PolicyFixture;
pub use recording::{RecordingPolicyState, StateWrite};
