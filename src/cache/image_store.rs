//! Image bytes store contract.

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::error::StoreError;

/// Storage contract for image bytes, keyed by URL.
///
/// Last write wins per key. Entries never expire and are never evicted by
/// the pipeline. Implementations must serialize operations internally.
#[async_trait]
pub trait ImageDataStore: Send + Sync {
  /// Returns the bytes stored for `url`, or `None` when absent.
  async fn retrieve(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError>;

  /// Stores `data` under `url`, overwriting any previous value.
  async fn insert(&self, data: Vec<u8>, url: &Url) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ImageDataStore + ?Sized> ImageDataStore for Arc<T> {
  async fn retrieve(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError> {
    (**self).retrieve(url).await
  }

  async fn insert(&self, data: Vec<u8>, url: &Url) -> Result<(), StoreError> {
    (**self).insert(data, url).await
  }
}
