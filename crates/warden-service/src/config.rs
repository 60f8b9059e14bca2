//! Policy service configuration

use serde::{Deserialize, Serialize};
use warden_core::WardenConfig;

/// Configuration for [`crate::PolicyService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyServiceConfig {
    /// New subscribers first receive the latest committed policy set, if
    /// there has been a commit. The initial empty set is never replayed.
    pub replay_latest_commit: bool,

    /// Without explicit input, merge master password policies from the
    /// enforced view (policies that bind the active user) rather than from
    /// every stored policy.
    pub merge_enforced_only: bool,
}

impl Default for PolicyServiceConfig {
    fn default() -> Self {
        Self {
            replay_latest_commit: false,
            merge_enforced_only: true,
        }
    }
}

impl PolicyServiceConfig {
    /// Create config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the latest commit to new subscribers
    pub fn with_replay_latest_commit(mut self, replay: bool) -> Self {
        self.replay_latest_commit = replay;
        self
    }

    /// Choose the default input of the master password merge
    pub fn with_merge_enforced_only(mut self, enforced_only: bool) -> Self {
        self.merge_enforced_only = enforced_only;
        self
    }
}

impl WardenConfig for PolicyServiceConfig {}
