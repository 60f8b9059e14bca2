//! Active account lock state.
//!
//! The lock state is passed to the policy service as an explicit watch
//! channel. `true` means the active account is unlocked.

use tokio::sync::watch;

/// Receiving side of the lock state, injected into the policy service
pub type AccountUnlockSignal = watch::Receiver<bool>;

/// Sending side of the lock state, held by whatever owns the session
#[derive(Debug, Clone)]
pub struct AccountUnlockHandle {
    tx: watch::Sender<bool>,
}

impl AccountUnlockHandle {
    /// Mark the active account unlocked
    pub fn unlock(&self) {
        self.tx.send_replace(true);
    }

    /// Mark the active account locked
    pub fn lock(&self) {
        self.tx.send_replace(false);
    }

    /// Current state
    pub fn is_unlocked(&self) -> bool {
        *self.tx.borrow()
    }

    /// Another receiver for the same state
    pub fn signal(&self) -> AccountUnlockSignal {
        self.tx.subscribe()
    }
}

/// Create a lock state channel starting at `unlocked`
pub fn account_unlock_channel(unlocked: bool) -> (AccountUnlockHandle, AccountUnlockSignal) {
    let (tx, rx) = watch::channel(unlocked);
    (AccountUnlockHandle { tx }, rx)
}
