//! SQLite-backed store engine implementing both store contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use url::Url;

use super::feed_store::{CachedFeed, FeedStore};
use super::image_store::ImageDataStore;
use crate::error::StoreError;
use crate::feed::FeedItem;

/// Schema for the cache tables.
///
/// The feed snapshot is a single row (id fixed at 0): replacing it is one
/// statement, so readers see either the old or the new snapshot.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS feed_snapshot (
    id INTEGER PRIMARY KEY CHECK (id = 0),
    items BLOB NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS image_data (
    url TEXT PRIMARY KEY,
    data BLOB NOT NULL
);
"#;

/// SQLite store. The connection is mutex-serialized, so concurrent callers
/// from any task see fully-applied writes only.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self, StoreError> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the store at an explicit path.
  pub fn open_at(path: &std::path::Path) -> Result<Self, StoreError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| StoreError::new(format!("failed to create cache directory: {}", e)))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| StoreError::new(format!("failed to open cache database at {}: {}", path.display(), e)))?;

    Self::with_connection(conn)
  }

  /// Open an in-memory store. Each call gets an independent database.
  pub fn in_memory() -> Result<Self, StoreError> {
    let conn = Connection::open_in_memory()
      .map_err(|e| StoreError::new(format!("failed to open in-memory database: {}", e)))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self, StoreError> {
    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| StoreError::new(format!("failed to run cache migrations: {}", e)))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Default database path under the platform data directory.
  fn default_path() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| StoreError::new("could not determine data directory"))?;

    Ok(data_dir.join("feedcache").join("cache.db"))
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
    self
      .conn
      .lock()
      .map_err(|e| StoreError::new(format!("lock poisoned: {}", e)))
  }
}

#[async_trait]
impl FeedStore for SqliteStore {
  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    let conn = self.lock()?;

    let row: Option<(Vec<u8>, String)> = conn
      .query_row(
        "SELECT items, timestamp FROM feed_snapshot WHERE id = 0",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )
      .optional()
      .map_err(|e| StoreError::new(format!("failed to read snapshot: {}", e)))?;

    match row {
      Some((items, timestamp)) => {
        let items: Vec<FeedItem> = serde_json::from_slice(&items)
          .map_err(|e| StoreError::new(format!("failed to decode snapshot: {}", e)))?;
        let timestamp = parse_timestamp(&timestamp)?;
        Ok(Some(CachedFeed { items, timestamp }))
      }
      None => Ok(None),
    }
  }

  async fn insert(&self, items: Vec<FeedItem>, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
    let data = serde_json::to_vec(&items)
      .map_err(|e| StoreError::new(format!("failed to encode snapshot: {}", e)))?;

    let conn = self.lock()?;
    conn
      .execute(
        "INSERT OR REPLACE INTO feed_snapshot (id, items, timestamp) VALUES (0, ?, ?)",
        params![data, timestamp.to_rfc3339()],
      )
      .map_err(|e| StoreError::new(format!("failed to write snapshot: {}", e)))?;

    Ok(())
  }

  async fn delete(&self) -> Result<(), StoreError> {
    let conn = self.lock()?;
    conn
      .execute("DELETE FROM feed_snapshot", [])
      .map_err(|e| StoreError::new(format!("failed to delete snapshot: {}", e)))?;

    Ok(())
  }
}

#[async_trait]
impl ImageDataStore for SqliteStore {
  async fn retrieve(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError> {
    let conn = self.lock()?;

    conn
      .query_row(
        "SELECT data FROM image_data WHERE url = ?",
        params![url.as_str()],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| StoreError::new(format!("failed to read image data: {}", e)))
  }

  async fn insert(&self, data: Vec<u8>, url: &Url) -> Result<(), StoreError> {
    let conn = self.lock()?;
    conn
      .execute(
        "INSERT OR REPLACE INTO image_data (url, data) VALUES (?, ?)",
        params![url.as_str(), data],
      )
      .map_err(|e| StoreError::new(format!("failed to write image data: {}", e)))?;

    Ok(())
  }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| StoreError::new(format!("failed to parse timestamp '{}': {}", s, e)))
}
