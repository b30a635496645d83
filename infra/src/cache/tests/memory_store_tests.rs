//! Unit tests for the in-memory entry store

use chrono::{Duration, TimeZone, Utc};
use sb_core::domain::SubjectKey;
use sb_core::services::verification::{EntryStore, ManualClock};
use sb_shared::config::MemoryCacheConfig;
use std::sync::Arc;

use crate::cache::MemoryEntryStore;

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 2, 7, 0, 0).unwrap())
}

fn store_with(clock: &ManualClock) -> MemoryEntryStore {
    MemoryEntryStore::new(Arc::new(clock.clone()))
}

#[tokio::test]
async fn test_put_then_check() {
    let clock = clock();
    let store = store_with(&clock);
    let subject = SubjectKey::new("driver@fleet.com");

    store.put(&subject, "482913", Duration::minutes(10)).await.unwrap();

    assert!(store.check(&subject, "482913").await.unwrap());
    // A match does not consume the entry
    assert!(store.check(&subject, "482913").await.unwrap());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_mismatch_keeps_entry() {
    let clock = clock();
    let store = store_with(&clock);
    let subject = SubjectKey::new("driver@fleet.com");

    store.put(&subject, "482913", Duration::minutes(10)).await.unwrap();

    assert!(!store.check(&subject, "000000").await.unwrap());
    assert!(!store.check(&subject, "48291").await.unwrap());
    assert!(store.check(&subject, "482913").await.unwrap());
}

#[tokio::test]
async fn test_unknown_subject_is_not_an_error() {
    let store = store_with(&clock());
    let subject = SubjectKey::new("nobody@fleet.com");

    assert!(!store.check(&subject, "123456").await.unwrap());
    assert!(store.remaining_ttl(&subject).await.unwrap().is_none());
    store.clear(&subject).await.unwrap();
}

#[tokio::test]
async fn test_subjects_are_case_insensitive() {
    let store = store_with(&clock());

    store
        .put(&SubjectKey::new("Driver@Fleet.com"), "111222", Duration::minutes(10))
        .await
        .unwrap();

    assert!(store
        .check(&SubjectKey::new("driver@fleet.com"), "111222")
        .await
        .unwrap());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_expired_entry_is_rejected_and_evicted() {
    let clock = clock();
    let store = store_with(&clock);
    let subject = SubjectKey::new("driver@fleet.com");

    store.put(&subject, "482913", Duration::minutes(10)).await.unwrap();

    clock.advance(Duration::minutes(10) - Duration::milliseconds(1));
    assert!(store.check(&subject, "482913").await.unwrap());

    // Expiry instant itself is already expired
    clock.advance(Duration::milliseconds(1));
    assert!(!store.check(&subject, "482913").await.unwrap());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_put_replaces_previous_code() {
    let clock = clock();
    let store = store_with(&clock);
    let subject = SubjectKey::new("driver@fleet.com");

    store.put(&subject, "111111", Duration::minutes(10)).await.unwrap();
    clock.advance(Duration::minutes(8));
    store.put(&subject, "222222", Duration::minutes(10)).await.unwrap();

    assert!(!store.check(&subject, "111111").await.unwrap());
    assert!(store.check(&subject, "222222").await.unwrap());

    // Lifetime restarts from the second put
    clock.advance(Duration::minutes(5));
    assert!(store.check(&subject, "222222").await.unwrap());
}

#[tokio::test]
async fn test_clear_removes_entry() {
    let store = store_with(&clock());
    let subject = SubjectKey::new("driver@fleet.com");

    store.put(&subject, "482913", Duration::minutes(10)).await.unwrap();
    store.clear(&subject).await.unwrap();

    assert!(!store.check(&subject, "482913").await.unwrap());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_remaining_ttl_counts_down() {
    let clock = clock();
    let store = store_with(&clock);
    let subject = SubjectKey::new("driver@fleet.com");

    store.put(&subject, "482913", Duration::minutes(10)).await.unwrap();
    clock.advance(Duration::minutes(3));

    assert_eq!(
        store.remaining_ttl(&subject).await.unwrap(),
        Some(Duration::minutes(7))
    );

    clock.advance(Duration::minutes(7));
    assert!(store.remaining_ttl(&subject).await.unwrap().is_none());
}

#[tokio::test]
async fn test_purge_expired_only_removes_expired() {
    let clock = clock();
    let store = store_with(&clock);

    store
        .put(&SubjectKey::new("a@fleet.com"), "111111", Duration::minutes(1))
        .await
        .unwrap();
    store
        .put(&SubjectKey::new("b@fleet.com"), "222222", Duration::minutes(2))
        .await
        .unwrap();
    store
        .put(&SubjectKey::new("c@fleet.com"), "333333", Duration::minutes(30))
        .await
        .unwrap();

    clock.advance(Duration::minutes(2));

    assert_eq!(store.purge_expired().await.unwrap(), 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.purge_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn test_with_config_shard_amounts() {
    let clock: Arc<ManualClock> = Arc::new(clock());

    for shard_amount in [0, 1, 3, 8, 64] {
        let store = MemoryEntryStore::with_config(&MemoryCacheConfig { shard_amount }, clock.clone());
        let subject = SubjectKey::new("driver@fleet.com");
        store.put(&subject, "482913", Duration::minutes(10)).await.unwrap();
        assert!(store.check(&subject, "482913").await.unwrap());
    }
}
