//! Event cache tests against a live Redis. Ignored by default; run with:
//!
//! ```text
//! REDIS_URL=redis://127.0.0.1/ cargo test -p backend --test event_cache -- --ignored
//! ```

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use backend::cache::{CacheError, EventCache};
use backend::crypto::FieldCipher;
use shared::api::Event;
use shared::models::random_slug;

fn cache() -> EventCache {
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let cipher = Arc::new(FieldCipher::new("event-cache-test-secret"));

    EventCache::new(&redis_url, cipher, 60).expect("failed to open redis client")
}

fn sample_event() -> Event {
    Event {
        title: "Quarterly review".into(),
        start: Utc.with_ymd_and_hms(2025, 10, 1, 14, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 10, 1, 15, 0, 0).unwrap(),
        all_day: false,
        tentative: false,
        description: None,
        calendar_title: Some("Work".into()),
        calendar_color: None,
        location: None,
        uuid: None,
    }
}

#[tokio::test]
#[ignore = "needs Redis via REDIS_URL"]
async fn stored_events_come_back_equal() {
    let cache = cache();
    let key = random_slug();
    let event = sample_event();

    cache.store(&key, &event).await.expect("store");
    let fetched = cache.fetch(&key).await.expect("fetch");
    assert_eq!(fetched, Some(event));

    cache.invalidate(&key).await.expect("invalidate");
    let fetched = cache.fetch(&key).await.expect("fetch after invalidate");
    assert_eq!(fetched, None);
}

#[tokio::test]
#[ignore = "needs Redis via REDIS_URL"]
async fn absent_keys_are_a_miss_not_an_error() {
    let cache = cache();

    let fetched = cache.fetch(&random_slug()).await.expect("fetch");
    assert_eq!(fetched, None);
}

#[tokio::test]
#[ignore = "needs Redis via REDIS_URL"]
async fn key_mismatch_surfaces_as_corruption() {
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let key = random_slug();

    let writer = EventCache::new(
        &redis_url,
        Arc::new(FieldCipher::new("writer-secret")),
        60,
    )
    .expect("writer client");
    writer.store(&key, &sample_event()).await.expect("store");

    let reader = EventCache::new(
        &redis_url,
        Arc::new(FieldCipher::new("reader-secret")),
        60,
    )
    .expect("reader client");

    let result = reader.fetch(&key).await;
    assert!(matches!(result, Err(CacheError::Corrupted(_))));

    writer.invalidate(&key).await.expect("cleanup");
}
