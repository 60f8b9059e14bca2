//! Ordered fan-out of committed policy sets
//!
//! Each subscriber owns an unbounded queue. A commit is pushed to every live
//! queue before the next commit can start, so subscribers see every commit
//! exactly once, in commit order. Nothing is coalesced or dropped.

use futures::Stream;
use parking_lot::{Mutex, RwLock};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use warden_core::Policy;

/// An immutable committed policy set
pub type PolicySet = Arc<[Policy]>;

pub(crate) struct PolicyPublisher {
    current: RwLock<PolicySet>,
    commits: AtomicU64,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<PolicySet>>>,
}

impl PolicyPublisher {
    pub(crate) fn new() -> Self {
        Self {
            current: RwLock::new(Arc::from(Vec::new())),
            commits: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn current(&self) -> PolicySet {
        self.current.read().clone()
    }

    pub(crate) fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Acquire)
    }

    /// Replace the current set and notify every live subscriber.
    ///
    /// The subscriber lock is held for the whole commit so a concurrent
    /// `subscribe` sees either the old set and this notification, or the
    /// new set and no notification.
    pub(crate) fn publish(&self, policies: Vec<Policy>) -> PolicySet {
        let set: PolicySet = Arc::from(policies);
        let mut subscribers = self.subscribers.lock();

        *self.current.write() = set.clone();
        self.commits.fetch_add(1, Ordering::AcqRel);

        // Receivers that were dropped are pruned here
        subscribers.retain(|tx| tx.send(set.clone()).is_ok());
        set
    }

    pub(crate) fn subscribe(&self, replay_latest: bool) -> PolicySubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.lock();

        if replay_latest && self.commit_count() > 0 {
            // Cannot fail, the receiver is still in scope
            let _ = tx.send(self.current());
        }

        subscribers.push(tx);
        PolicySubscription { rx }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

/// Receives every policy set committed after it was created.
///
/// Dropping the subscription unsubscribes. The stream ends when the
/// service is dropped.
#[derive(Debug)]
pub struct PolicySubscription {
    rx: mpsc::UnboundedReceiver<PolicySet>,
}

impl PolicySubscription {
    /// Wait for the next commit
    pub async fn recv(&mut self) -> Option<PolicySet> {
        self.rx.recv().await
    }

    /// Next already-delivered commit, without waiting
    pub fn try_recv(&mut self) -> Option<PolicySet> {
        self.rx.try_recv().ok()
    }
}

impl Stream for PolicySubscription {
    type Item = PolicySet;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{OrganizationId, PolicyId, PolicyType};

    fn policy(id: &str) -> Policy {
        Policy {
            id: PolicyId::new(id),
            organization_id: OrganizationId::new("org"),
            policy_type: PolicyType::SingleOrg,
            enabled: true,
            data: None,
        }
    }

    fn ids(set: &PolicySet) -> Vec<&str> {
        set.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_initial_state_is_not_delivered() {
        let publisher = PolicyPublisher::new();
        let mut sub = publisher.subscribe(true);
        assert!(publisher.current().is_empty());
        assert!(sub.try_recv().is_none());
        assert_eq!(publisher.commit_count(), 0);
    }

    #[test]
    fn test_every_commit_delivered_in_order() {
        let publisher = PolicyPublisher::new();
        let mut sub = publisher.subscribe(false);

        publisher.publish(vec![policy("a")]);
        publisher.publish(vec![policy("a"), policy("b")]);
        publisher.publish(Vec::new());

        assert_eq!(ids(&sub.try_recv().unwrap()), vec!["a"]);
        assert_eq!(ids(&sub.try_recv().unwrap()), vec!["a", "b"]);
        assert!(sub.try_recv().unwrap().is_empty());
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_late_subscriber_without_replay_sees_only_later_commits() {
        let publisher = PolicyPublisher::new();
        publisher.publish(vec![policy("a")]);

        let mut sub = publisher.subscribe(false);
        assert!(sub.try_recv().is_none());

        publisher.publish(vec![policy("b")]);
        assert_eq!(ids(&sub.try_recv().unwrap()), vec!["b"]);
    }

    #[test]
    fn test_late_subscriber_with_replay_sees_latest_commit_once() {
        let publisher = PolicyPublisher::new();
        publisher.publish(vec![policy("a")]);
        publisher.publish(vec![policy("b")]);

        let mut sub = publisher.subscribe(true);
        assert_eq!(ids(&sub.try_recv().unwrap()), vec!["b"]);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let publisher = PolicyPublisher::new();
        let kept = publisher.subscribe(false);
        let dropped = publisher.subscribe(false);
        assert_eq!(publisher.subscriber_count(), 2);

        drop(dropped);
        publisher.publish(vec![policy("a")]);
        assert_eq!(publisher.subscriber_count(), 1);
        drop(kept);
    }
}
