//! Policy store mutations, persistence effects and commit delivery

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;
use warden_core::effects::PolicyStateEffects;
use warden_core::{PolicyType, UserId, WardenError};
use warden_effects::StaticOrganizationDirectory;
use warden_service::{PolicyService, PolicyServiceConfig, PolicySet, PolicySubscription};
use warden_testkit::{policy_map, PolicyBuilder, PolicyFixture, RecordingPolicyState, StateWrite};

type Service = PolicyService<RecordingPolicyState, StaticOrganizationDirectory>;

fn service_with(fixture: &PolicyFixture, config: PolicyServiceConfig) -> Arc<Service> {
    let _ = tracing_subscriber::fmt::try_init();
    Arc::new(PolicyService::new(
        fixture.state.clone(),
        fixture.directory.clone(),
        config,
    ))
}

fn service(fixture: &PolicyFixture) -> Arc<Service> {
    service_with(fixture, PolicyServiceConfig::default())
}

async fn next_commit(sub: &mut PolicySubscription) -> PolicySet {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("commit within timeout")
        .expect("service alive")
}

fn ids(set: &[warden_core::Policy]) -> Vec<&str> {
    set.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn upsert_into_empty_state_publishes_and_persists() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    let mut sub = service.subscribe();

    service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap();

    assert_eq!(ids(&next_commit(&mut sub).await), vec!["p1"]);
    assert_eq!(ids(&service.current()), vec!["p1"]);
    assert!(service.has_loaded());
    assert_eq!(
        fixture.state.writes(),
        vec![
            StateWrite::Decrypted {
                user_id: None,
                count: None
            },
            StateWrite::Encrypted {
                user_id: None,
                count: Some(1)
            },
        ]
    );
}

#[tokio::test]
async fn upsert_replaces_by_id_and_keeps_position() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);

    for id in ["p1", "p2"] {
        service
            .upsert(PolicyBuilder::new(id, "org", PolicyType::SingleOrg).build_data())
            .await
            .unwrap();
    }
    service
        .upsert(
            PolicyBuilder::new("p1", "org", PolicyType::SingleOrg)
                .enabled(false)
                .build_data(),
        )
        .await
        .unwrap();

    let current = service.current();
    assert_eq!(ids(&current), vec!["p1", "p2"]);
    assert!(!current[0].enabled);

    let stored = fixture.state.encrypted_policies(None).await.unwrap().unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn upsert_write_failure_propagates_after_publish() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    let mut sub = service.subscribe();

    fixture.state.fail_writes(true);
    let err = service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap_err();

    assert!(err.is_storage());
    assert_eq!(ids(&service.current()), vec!["p1"]);
    assert_eq!(ids(&next_commit(&mut sub).await), vec!["p1"]);
    assert_eq!(fixture.state.inner().encrypted_policies(None).await.unwrap(), None);
}

#[tokio::test]
async fn upsert_read_failure_commits_nothing() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    let mut sub = service.subscribe();

    fixture.state.fail_reads(true);
    let result = service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await;

    assert!(matches!(result, Err(WardenError::Storage { .. })));
    assert!(!service.has_loaded());
    assert!(sub.try_recv().is_none());
    assert!(fixture.state.writes().is_empty());
}

#[tokio::test]
async fn replace_all_swaps_the_whole_set() {
    let fixture = PolicyFixture::new("alice");
    fixture
        .seed_encrypted([PolicyBuilder::new("old", "org", PolicyType::SingleOrg).build_data()])
        .await
        .unwrap();
    let service = service(&fixture);
    let mut sub = service.subscribe();

    let replacement = policy_map([
        PolicyBuilder::new("p2", "org", PolicyType::SingleOrg).build_data(),
        PolicyBuilder::master_password("p3", "org").build_data(),
    ]);
    service.replace_all(replacement.clone()).await.unwrap();

    assert_eq!(ids(&next_commit(&mut sub).await), vec!["p2", "p3"]);
    assert_eq!(
        fixture.state.encrypted_policies(None).await.unwrap(),
        Some(replacement)
    );
    assert_eq!(fixture.state.decrypted_policies(None).await.unwrap(), None);
}

#[tokio::test]
async fn clear_of_active_account_publishes_empty() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap();
    let mut sub = service.subscribe();
    fixture.state.clear_writes();

    service.clear(None).await.unwrap();

    assert!(next_commit(&mut sub).await.is_empty());
    assert!(service.current().is_empty());
    assert_eq!(fixture.state.encrypted_policies(None).await.unwrap(), None);
    assert_eq!(
        fixture.state.writes(),
        vec![
            StateWrite::Decrypted {
                user_id: None,
                count: None
            },
            StateWrite::Encrypted {
                user_id: None,
                count: None
            },
        ]
    );

    // Naming the active account explicitly behaves the same
    service.clear(Some(&fixture.user_id)).await.unwrap();
    assert!(next_commit(&mut sub).await.is_empty());
}

#[tokio::test]
async fn clear_of_other_account_keeps_current_set() {
    let fixture = PolicyFixture::new("alice");
    let bob = UserId::new("bob");
    fixture
        .state
        .inner()
        .set_encrypted_policies(
            Some(policy_map([
                PolicyBuilder::new("b1", "org", PolicyType::SingleOrg).build_data()
            ])),
            Some(&bob),
        )
        .await
        .unwrap();

    let service = service(&fixture);
    service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap();
    let mut sub = service.subscribe();

    service.clear(Some(&bob)).await.unwrap();

    assert!(sub.try_recv().is_none());
    assert_eq!(ids(&service.current()), vec!["p1"]);
    assert_eq!(fixture.state.encrypted_policies(Some(&bob)).await.unwrap(), None);
    assert!(fixture.state.encrypted_policies(None).await.unwrap().is_some());
}

#[tokio::test]
async fn load_decodes_once_and_caches() {
    let fixture = PolicyFixture::new("alice");
    fixture
        .seed_encrypted([
            PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data(),
            PolicyBuilder::master_password("p2", "org").build_data(),
        ])
        .await
        .unwrap();
    let service = service(&fixture);

    let all = service.load(None, None).await.unwrap();
    assert_eq!(ids(&all), vec!["p1", "p2"]);
    assert_eq!(
        fixture.state.writes(),
        vec![StateWrite::Decrypted {
            user_id: None,
            count: Some(2)
        }]
    );

    let master = service
        .load(None, Some(PolicyType::MasterPassword))
        .await
        .unwrap();
    assert_eq!(ids(&master), vec!["p2"]);

    // Second call was a cache hit
    assert_eq!(fixture.state.writes().len(), 1);
    assert!(!service.has_loaded());
}

#[tokio::test]
async fn load_of_empty_account_caches_empty_list() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);

    assert!(service.load(None, None).await.unwrap().is_empty());
    assert_eq!(
        fixture.state.decrypted_policies(None).await.unwrap(),
        Some(Vec::new())
    );
}

#[tokio::test]
async fn load_addresses_the_named_account() {
    let fixture = PolicyFixture::new("alice");
    let bob = UserId::new("bob");
    fixture
        .state
        .inner()
        .set_encrypted_policies(
            Some(policy_map([
                PolicyBuilder::new("b1", "org", PolicyType::SingleOrg).build_data()
            ])),
            Some(&bob),
        )
        .await
        .unwrap();
    let service = service(&fixture);

    assert_eq!(ids(&service.load(Some(&bob), None).await.unwrap()), vec!["b1"]);
    assert!(service.load(None, None).await.unwrap().is_empty());
    assert_eq!(
        fixture.state.writes()[0],
        StateWrite::Decrypted {
            user_id: Some(bob),
            count: Some(1)
        }
    );
}

#[tokio::test]
async fn late_subscriber_sees_only_later_commits() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap();

    let mut late = service.subscribe();
    assert!(late.try_recv().is_none());

    service
        .upsert(PolicyBuilder::new("p2", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap();
    assert_eq!(ids(&next_commit(&mut late).await), vec!["p1", "p2"]);
}

#[tokio::test]
async fn replay_config_delivers_latest_commit_first() {
    let fixture = PolicyFixture::new("alice");
    let service = service_with(
        &fixture,
        PolicyServiceConfig::new().with_replay_latest_commit(true),
    );

    // Nothing committed yet, so nothing is replayed
    let mut early = service.subscribe();
    assert!(early.try_recv().is_none());

    service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap();

    let mut late = service.subscribe();
    assert_eq!(ids(&next_commit(&mut late).await), vec!["p1"]);
    assert!(late.try_recv().is_none());
    assert_eq!(ids(&next_commit(&mut early).await), vec!["p1"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_upserts_are_delivered_in_commit_order() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    let mut first = service.subscribe();
    let mut second = service.subscribe();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .upsert(
                        PolicyBuilder::new(format!("p{i}"), "org", PolicyType::SingleOrg)
                            .build_data(),
                    )
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // Every commit adds one record, so sizes must arrive as 1, 2, ..., 20
    for expected in 1..=20 {
        assert_eq!(next_commit(&mut first).await.len(), expected);
        assert_eq!(next_commit(&mut second).await.len(), expected);
    }
    assert!(first.try_recv().is_none());
    assert_eq!(service.current().len(), 20);
}

#[tokio::test]
async fn dropped_subscriber_does_not_block_others() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    let dropped = service.subscribe();
    let mut kept = service.subscribe();
    drop(dropped);
    assert_eq!(service.subscriber_count(), 1);

    service
        .upsert(PolicyBuilder::new("p1", "org", PolicyType::SingleOrg).build_data())
        .await
        .unwrap();

    assert_eq!(ids(&next_commit(&mut kept).await), vec!["p1"]);
}

#[tokio::test]
async fn subscription_ends_when_service_is_dropped() {
    let fixture = PolicyFixture::new("alice");
    let service = service(&fixture);
    let mut sub = service.subscribe();

    drop(service);
    assert!(sub.recv().await.is_none());
}
