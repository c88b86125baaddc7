//! Encrypted event cache.
//!
//! Computed calendar events are stored in Redis as encrypted JSON blobs,
//! sealed with the same cipher as the encrypted columns. A blob that fails
//! to decrypt or parse is corruption and is reported as such; only a truly
//! absent key is a miss.

use std::sync::Arc;

use redis::AsyncCommands;
use thiserror::Error;

use shared::api::Event;

use crate::crypto::FieldCipher;

const KEY_PREFIX: &str = "event_cache";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error")]
    Backend(#[from] redis::RedisError),

    /// Failure on the way in: the event could not be serialized or sealed.
    #[error("failed to seal event for caching")]
    Seal(#[source] anyhow::Error),

    /// Failure on the way out: present but undecodable. Never a miss.
    #[error("corrupted cache entry")]
    Corrupted(#[source] anyhow::Error),
}

/// Serializes an event and encrypts the JSON for storage.
pub fn seal_event(cipher: &FieldCipher, event: &Event) -> Result<String, CacheError> {
    let json = serde_json::to_string(event).map_err(|e| CacheError::Seal(e.into()))?;
    cipher.encrypt(&json).map_err(|e| CacheError::Seal(e.into()))
}

/// Decrypts and parses a sealed blob back into an event.
///
/// Round-trip contract: `open_event(seal_event(e)) == e`.
pub fn open_event(cipher: &FieldCipher, blob: &str) -> Result<Event, CacheError> {
    let json = cipher
        .decrypt(blob)
        .map_err(|e| CacheError::Corrupted(e.into()))?;
    serde_json::from_str(&json).map_err(|e| CacheError::Corrupted(e.into()))
}

/// Redis-backed store for sealed events.
pub struct EventCache {
    client: redis::Client,
    cipher: Arc<FieldCipher>,
    ttl_seconds: u64,
}

impl EventCache {
    pub fn new(
        redis_url: &str,
        cipher: Arc<FieldCipher>,
        ttl_seconds: u64,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        Ok(EventCache {
            client,
            cipher,
            ttl_seconds,
        })
    }

    pub async fn store(&self, key: &str, event: &Event) -> Result<(), CacheError> {
        let blob = seal_event(&self.cipher, event)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SETEX")
            .arg(Self::namespaced(key))
            .arg(self.ttl_seconds)
            .arg(blob)
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(())
    }

    /// `Ok(None)` means the key is absent; a present but undecodable entry
    /// surfaces as [`CacheError::Corrupted`].
    pub async fn fetch(&self, key: &str) -> Result<Option<Event>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let blob: Option<String> = conn.get(Self::namespaced(key)).await?;

        match blob {
            None => Ok(None),
            Some(blob) => open_event(&self.cipher, &blob).map(Some),
        }
    }

    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::namespaced(key)).await?;

        Ok(())
    }

    fn namespaced(key: &str) -> String {
        format!("{}:{}", KEY_PREFIX, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::api::EventLocation;
    use shared::models::LocationType;
    use uuid::Uuid;

    fn cipher() -> FieldCipher {
        FieldCipher::new("cache-test-secret")
    }

    fn sample_event() -> Event {
        Event {
            title: "Standup".into(),
            start: Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 2, 9, 15, 0).unwrap(),
            all_day: false,
            tentative: true,
            description: Some("Daily sync".into()),
            calendar_title: Some("Work".into()),
            calendar_color: Some("#0a84ff".into()),
            location: Some(EventLocation {
                kind: Some(LocationType::Online),
                url: Some("https://meet.example.com/standup".into()),
                ..EventLocation::default()
            }),
            uuid: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn sealed_events_round_trip_field_for_field() {
        let cipher = cipher();
        let event = sample_event();

        let blob = seal_event(&cipher, &event).unwrap();
        assert!(blob.starts_with("v1:"));
        assert!(!blob.contains("Standup"));

        let restored = open_event(&cipher, &blob).unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn undecryptable_blob_is_corruption() {
        let result = open_event(&cipher(), "v1:AAAAAAAAAAAAAAAA:AAAA");
        assert!(matches!(result, Err(CacheError::Corrupted(_))));
    }

    #[test]
    fn wrong_key_is_corruption_not_a_miss() {
        let blob = seal_event(&cipher(), &sample_event()).unwrap();
        let other = FieldCipher::new("some-other-secret");

        assert!(matches!(
            open_event(&other, &blob),
            Err(CacheError::Corrupted(_))
        ));
    }

    #[test]
    fn valid_ciphertext_with_broken_json_is_corruption() {
        let cipher = cipher();
        let blob = cipher.encrypt("{\"title\": \"half an event\"").unwrap();

        assert!(matches!(
            open_event(&cipher, &blob),
            Err(CacheError::Corrupted(_))
        ));
    }
}
