//! Account lock state reaction

use crate::service::PolicyService;
use std::sync::Weak;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use warden_core::effects::{AccountUnlockSignal, OrganizationDirectory, PolicyStateEffects};

/// Background task applying account lock transitions to a policy service.
///
/// The task exits after [`Self::stop`] or a drop of the listener, and also
/// once the signal sender or the service is gone. Rapid toggles may be
/// observed only as their final state.
#[derive(Debug)]
pub struct UnlockListener {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl UnlockListener {
    pub(crate) fn spawn<S, D>(
        service: Weak<PolicyService<S, D>>,
        mut signal: AccountUnlockSignal,
    ) -> Self
    where
        S: PolicyStateEffects + 'static,
        D: OrganizationDirectory + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut unlocked = *signal.borrow_and_update();
            loop {
                let Some(service) = service.upgrade() else {
                    break;
                };
                tracing::debug!(unlocked, "Account lock state changed");
                service.apply_lock_state(unlocked).await;
                drop(service);

                // Only the wait is cancelled; a transition in progress runs
                // to completion
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    changed = signal.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                unlocked = *signal.borrow_and_update();
            }
        });

        Self {
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Whether the task is still following the signal
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop following and wait for the task to exit
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for UnlockListener {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
