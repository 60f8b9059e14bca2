//! Warden Service - the observable policy store
//!
//! [`PolicyService`] owns the active account's policy set. It keeps the set
//! in step with persistence and with the account lock state, publishes every
//! replacement to subscribers in order, and answers applicability and
//! master password questions against it.
//!
//! ```ignore
//! let service = Arc::new(PolicyService::new(state, directory, PolicyServiceConfig::default()));
//! let _listener = service.watch_account_unlock(signal);
//! let mut policies = service.subscribe();
//! while let Some(set) = policies.recv().await {
//!     render(&set);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod publisher;
pub mod service;
pub mod unlock;

pub use config::PolicyServiceConfig;
pub use publisher::{PolicySet, PolicySubscription};
pub use service::PolicyService;
pub use unlock::UnlockListener;

pub use warden_policy::{evaluate_master_password, PasswordRequirement, PolicyFilter};
