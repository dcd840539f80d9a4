//! Local persistence: store contracts, freshness policy, and the loaders
//! that orchestrate them.

pub mod feed_loader;
pub mod feed_store;
pub mod image_loader;
pub mod image_store;
pub mod in_memory;
pub mod policy;
pub mod sqlite;

pub use feed_loader::{LocalFeedLoader, OfflineFeedLoader};
pub use feed_store::{CachedFeed, FeedStore};
pub use image_loader::LocalImageDataLoader;
pub use image_store::ImageDataStore;
pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::error::StoreError;
use crate::feed::FeedItem;

/// Save side of the feed cache, as a capability of its own.
///
/// The write-through decorator only needs this one operation, so it is kept
/// separate from the loading contract.
#[async_trait]
pub trait FeedCache: Send + Sync {
  async fn save(&self, items: &[FeedItem]) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: FeedCache + ?Sized> FeedCache for Arc<T> {
  async fn save(&self, items: &[FeedItem]) -> Result<(), StoreError> {
    (**self).save(items).await
  }
}

#[async_trait]
impl<T: FeedCache + ?Sized> FeedCache for &T {
  async fn save(&self, items: &[FeedItem]) -> Result<(), StoreError> {
    (**self).save(items).await
  }
}

/// Save side of the image cache.
#[async_trait]
pub trait ImageDataCache: Send + Sync {
  async fn save(&self, data: &[u8], url: &Url) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ImageDataCache + ?Sized> ImageDataCache for Arc<T> {
  async fn save(&self, data: &[u8], url: &Url) -> Result<(), StoreError> {
    (**self).save(data, url).await
  }
}

#[async_trait]
impl<T: ImageDataCache + ?Sized> ImageDataCache for &T {
  async fn save(&self, data: &[u8], url: &Url) -> Result<(), StoreError> {
    (**self).save(data, url).await
  }
}
