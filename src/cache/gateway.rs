//! Gateway between the sync controller and the raw key-value store.
//!
//! Holds exactly one cached result set: the unfiltered home feed. Search
//! results are never written here. Freshness is the controller's call - the
//! gateway hands back the stored timestamp and otherwise stays out of TTL
//! decisions.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::flickr::Photo;

use super::storage::KvStorage;

/// Fixed keys for the single cached result set.
const PHOTOS_KEY: &str = "home_feed_photos";
const STORED_AT_KEY: &str = "home_feed_stored_at";

/// The cached home feed plus the moment it was written.
#[derive(Debug, Clone)]
pub struct CachedFeed {
  pub photos: Vec<Photo>,
  pub stored_at: DateTime<Utc>,
}

/// TTL-agnostic read/write of the cached home feed.
///
/// Every failure path is soft: storage or decode problems are logged at
/// `warn` and surface as a miss (read) or a dropped write. Nothing here ever
/// propagates an error into the controller.
pub struct CacheGateway {
  storage: Box<dyn KvStorage>,
}

impl CacheGateway {
  pub fn new(storage: Box<dyn KvStorage>) -> Self {
    Self { storage }
  }

  /// Read the cached home feed, or `None` on miss or any failure.
  pub fn read(&self) -> Option<CachedFeed> {
    let photos_json = match self.storage.get(PHOTOS_KEY) {
      Ok(value) => value?,
      Err(e) => {
        warn!("cache read failed: {e}");
        return None;
      }
    };

    let stored_at_raw = match self.storage.get(STORED_AT_KEY) {
      Ok(value) => value?,
      Err(e) => {
        warn!("cache timestamp read failed: {e}");
        return None;
      }
    };

    let photos: Vec<Photo> = match serde_json::from_str(&photos_json) {
      Ok(photos) => photos,
      Err(e) => {
        warn!("cached photo list did not parse: {e}");
        return None;
      }
    };

    let stored_at = stored_at_raw
      .parse::<i64>()
      .ok()
      .and_then(DateTime::from_timestamp_millis);

    match stored_at {
      Some(stored_at) => Some(CachedFeed { photos, stored_at }),
      None => {
        warn!(raw = %stored_at_raw, "cached timestamp did not parse");
        None
      }
    }
  }

  /// Write the home feed. Best-effort; failures are logged and swallowed.
  pub fn write(&self, photos: &[Photo], stored_at: DateTime<Utc>) {
    let json = match serde_json::to_string(photos) {
      Ok(json) => json,
      Err(e) => {
        warn!("failed to serialize photo list for cache: {e}");
        return;
      }
    };

    if let Err(e) = self.storage.set(PHOTOS_KEY, &json) {
      warn!("cache write failed: {e}");
      return;
    }

    let millis = stored_at.timestamp_millis().to_string();
    if let Err(e) = self.storage.set(STORED_AT_KEY, &millis) {
      warn!("cache timestamp write failed: {e}");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::storage::SqliteStorage;
  use color_eyre::{eyre::eyre, Result};

  /// Storage whose every operation fails.
  struct BrokenStorage;

  impl KvStorage for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
      Err(eyre!("disk on fire"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
      Err(eyre!("disk on fire"))
    }
  }

  fn photo(id: &str) -> Photo {
    Photo {
      id: id.to_string(),
      url: format!("https://live.example/{id}_s.jpg"),
      title: format!("photo {id}"),
      secret: "s".to_string(),
    }
  }

  #[test]
  fn test_write_then_read_round_trip() {
    let gateway = CacheGateway::new(Box::new(SqliteStorage::open_in_memory().unwrap()));
    let photos = vec![photo("1"), photo("2")];
    let stored_at = Utc::now();

    gateway.write(&photos, stored_at);

    let cached = gateway.read().expect("entry should be present");
    assert_eq!(cached.photos, photos);
    assert_eq!(cached.stored_at.timestamp_millis(), stored_at.timestamp_millis());
  }

  #[test]
  fn test_empty_store_reads_as_miss() {
    let gateway = CacheGateway::new(Box::new(SqliteStorage::open_in_memory().unwrap()));
    assert!(gateway.read().is_none());
  }

  #[test]
  fn test_storage_failure_is_swallowed() {
    let gateway = CacheGateway::new(Box::new(BrokenStorage));
    // Neither direction panics or propagates
    gateway.write(&[photo("1")], Utc::now());
    assert!(gateway.read().is_none());
  }

  #[test]
  fn test_corrupt_payload_reads_as_miss() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.set(PHOTOS_KEY, "not json at all").unwrap();
    storage.set(STORED_AT_KEY, "1700000000000").unwrap();

    let gateway = CacheGateway::new(Box::new(storage));
    assert!(gateway.read().is_none());
  }

  #[test]
  fn test_corrupt_timestamp_reads_as_miss() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.set(PHOTOS_KEY, "[]").unwrap();
    storage.set(STORED_AT_KEY, "yesterday-ish").unwrap();

    let gateway = CacheGateway::new(Box::new(storage));
    assert!(gateway.read().is_none());
  }
}
