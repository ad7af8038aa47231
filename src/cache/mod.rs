//! Persistence for the home feed.
//!
//! Two layers: an opaque key-value store (`KvStorage`, SQLite-backed) and a
//! gateway that serializes the photo list plus its epoch-millisecond write
//! timestamp under fixed keys. Storage failures never escape the gateway.

mod gateway;
pub mod storage;

pub use gateway::{CacheGateway, CachedFeed};
pub use storage::{KvStorage, NoopStorage, SqliteStorage};
