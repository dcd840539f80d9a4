//! Local feed loading against the snapshot store.
//!
//! `LocalFeedLoader` is the policy-checked path: a stale snapshot reads as
//! an empty feed, and only `validate_cache` evicts it. `OfflineFeedLoader`
//! is the policy-bypassing read used as the network fallback, so going
//! offline can still surface a snapshot older than the max cache age.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::feed_store::FeedStore;
use super::policy;
use super::FeedCache;
use crate::error::{LoadError, StoreError};
use crate::feed::{FeedItem, FeedLoader};

/// Orchestrates read/validate/replace against the feed store.
pub struct LocalFeedLoader<S> {
  store: S,
  current_time: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl<S: FeedStore> LocalFeedLoader<S> {
  pub fn new(store: S) -> Self {
    Self {
      store,
      current_time: Box::new(Utc::now),
    }
  }

  /// Override the clock. Tests use this to move time forward.
  pub fn with_clock(
    mut self,
    clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
  ) -> Self {
    self.current_time = Box::new(clock);
    self
  }

  fn now(&self) -> DateTime<Utc> {
    (self.current_time)()
  }

  /// Evicts the snapshot when it is unreadable or stale.
  ///
  /// This is the only path that proactively deletes stale data; `load`
  /// leaves a stale snapshot in place.
  pub async fn validate_cache(&self) -> Result<(), StoreError> {
    match self.store.retrieve().await {
      Err(_) => {
        debug!("cache unreadable, evicting");
        self.store.delete().await
      }
      Ok(Some(cached)) if !policy::is_fresh(cached.timestamp, self.now()) => {
        debug!(timestamp = %cached.timestamp, "cache expired, evicting");
        self.store.delete().await
      }
      Ok(_) => Ok(()),
    }
  }
}

#[async_trait]
impl<S: FeedStore> FeedLoader for LocalFeedLoader<S> {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    match self.store.retrieve().await {
      Err(err) => {
        // Self-heal: an unreadable snapshot is dropped so the next write
        // starts clean, but the read failure still reaches the caller.
        if let Err(delete_err) = self.store.delete().await {
          warn!(error = %delete_err, "failed to delete unreadable cache");
        }
        Err(err.into())
      }
      Ok(Some(cached)) if policy::is_fresh(cached.timestamp, self.now()) => Ok(cached.items),
      Ok(_) => Ok(Vec::new()),
    }
  }
}

#[async_trait]
impl<S: FeedStore> FeedCache for LocalFeedLoader<S> {
  async fn save(&self, items: &[FeedItem]) -> Result<(), StoreError> {
    self.store.delete().await?;
    self.store.insert(items.to_vec(), self.now()).await
  }
}

/// Policy-bypassing read of the snapshot store.
///
/// Serves whatever snapshot exists, however old. Used only as the fallback
/// leg of the feed composite; the direct load path stays policy-checked.
pub struct OfflineFeedLoader<S> {
  store: S,
}

impl<S: FeedStore> OfflineFeedLoader<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }
}

#[async_trait]
impl<S: FeedStore> FeedLoader for OfflineFeedLoader<S> {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    match self.store.retrieve().await? {
      Some(cached) => Ok(cached.items),
      None => Ok(Vec::new()),
    }
  }
}
