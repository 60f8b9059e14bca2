//! Effect interfaces consumed by the policy service
//!
//! Traits only; handlers live in `warden-effects` and test doubles in
//! `warden-testkit`.

pub mod account;
pub mod directory;
pub mod state;

pub use account::{account_unlock_channel, AccountUnlockHandle, AccountUnlockSignal};
pub use directory::OrganizationDirectory;
pub use state::PolicyStateEffects;
