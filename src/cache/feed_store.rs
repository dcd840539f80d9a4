//! Feed snapshot store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::StoreError;
use crate::feed::FeedItem;

/// The single cached feed snapshot: an ordered item list plus the moment it
/// was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
  pub items: Vec<FeedItem>,
  pub timestamp: DateTime<Utc>,
}

/// Storage contract for the feed snapshot.
///
/// A store holds at most one snapshot. `insert` is an atomic full replace:
/// on failure the previous snapshot must remain intact, and a concurrent
/// reader must see either the fully-old or the fully-new snapshot, never a
/// partial write. Implementations must serialize operations internally;
/// callers may invoke them from any task.
#[async_trait]
pub trait FeedStore: Send + Sync {
  /// Returns the current snapshot, or `None` when the store is empty.
  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError>;

  /// Replaces the snapshot wholesale.
  async fn insert(&self, items: Vec<FeedItem>, timestamp: DateTime<Utc>) -> Result<(), StoreError>;

  /// Clears the snapshot. Succeeds trivially when already empty.
  async fn delete(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: FeedStore + ?Sized> FeedStore for Arc<T> {
  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    (**self).retrieve().await
  }

  async fn insert(&self, items: Vec<FeedItem>, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
    (**self).insert(items, timestamp).await
  }

  async fn delete(&self) -> Result<(), StoreError> {
    (**self).delete().await
  }
}
