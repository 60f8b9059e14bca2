//! Policy state handler with failure injection and a write journal

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use warden_core::effects::PolicyStateEffects;
use warden_core::{Policy, PolicyDataMap, UserId, WardenError, WardenResult};
use warden_effects::MemoryPolicyState;

/// A write observed by [`RecordingPolicyState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateWrite {
    /// `set_encrypted_policies`, with the record count or `None` for a clear
    Encrypted {
        /// Target account as passed by the caller
        user_id: Option<UserId>,
        /// Number of records written
        count: Option<usize>,
    },
    /// `set_decrypted_policies`, with the policy count or `None` for an invalidation
    Decrypted {
        /// Target account as passed by the caller
        user_id: Option<UserId>,
        /// Number of policies written
        count: Option<usize>,
    },
}

/// Wraps [`MemoryPolicyState`], journals writes and fails on demand
#[derive(Debug, Clone)]
pub struct RecordingPolicyState {
    inner: MemoryPolicyState,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<Mutex<Vec<StateWrite>>>,
}

impl RecordingPolicyState {
    /// Wrap an existing handler
    pub fn new(inner: MemoryPolicyState) -> Self {
        Self {
            inner,
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The wrapped handler
    pub fn inner(&self) -> &MemoryPolicyState {
        &self.inner
    }

    /// Make every read fail until reset
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail until reset
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful writes so far, in order
    pub fn writes(&self) -> Vec<StateWrite> {
        self.writes.lock().clone()
    }

    /// Forget journaled writes
    pub fn clear_writes(&self) {
        self.writes.lock().clear();
    }

    fn check_read(&self) -> WardenResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(WardenError::storage("injected read failure"));
        }
        Ok(())
    }

    fn check_write(&self) -> WardenResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WardenError::storage("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyStateEffects for RecordingPolicyState {
    async fn encrypted_policies(
        &self,
        user_id: Option<&UserId>,
    ) -> WardenResult<Option<PolicyDataMap>> {
        self.check_read()?;
        self.inner.encrypted_policies(user_id).await
    }

    async fn set_encrypted_policies(
        &self,
        policies: Option<PolicyDataMap>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()> {
        self.check_write()?;
        let count = policies.as_ref().map(PolicyDataMap::len);
        self.inner.set_encrypted_policies(policies, user_id).await?;
        self.writes.lock().push(StateWrite::Encrypted {
            user_id: user_id.cloned(),
            count,
        });
        Ok(())
    }

    async fn decrypted_policies(&self, user_id: Option<&UserId>) -> WardenResult<Option<Vec<Policy>>> {
        self.check_read()?;
        self.inner.decrypted_policies(user_id).await
    }

    async fn set_decrypted_policies(
        &self,
        policies: Option<Vec<Policy>>,
        user_id: Option<&UserId>,
    ) -> WardenResult<()> {
        self.check_write()?;
        let count = policies.as_ref().map(Vec::len);
        self.inner.set_decrypted_policies(policies, user_id).await?;
        self.writes.lock().push(StateWrite::Decrypted {
            user_id: user_id.cloned(),
            count,
        });
        Ok(())
    }

    async fn active_user_id(&self) -> WardenResult<Option<UserId>> {
        self.inner.active_user_id().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_injected_failures_and_journal() {
        let state =
            RecordingPolicyState::new(MemoryPolicyState::with_active_user(UserId::new("u")));

        state.set_decrypted_policies(None, None).await.unwrap();
        assert_eq!(
            state.writes(),
            vec![StateWrite::Decrypted {
                user_id: None,
                count: None
            }]
        );

        state.fail_writes(true);
        let err = state
            .set_encrypted_policies(Some(PolicyDataMap::new()), None)
            .await
            .unwrap_err();
        assert!(err.is_storage());
        assert_eq!(state.writes().len(), 1);

        state.fail_reads(true);
        assert!(state.encrypted_policies(None).await.is_err());
    }
}
