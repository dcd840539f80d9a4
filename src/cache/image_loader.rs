//! Local image data loading against the URL-keyed byte store.

use async_trait::async_trait;
use url::Url;

use super::image_store::ImageDataStore;
use super::ImageDataCache;
use crate::error::{LoadError, StoreError};
use crate::image::ImageDataLoader;

/// Per-URL byte lookup and insert. Images are content-addressed by their
/// URL and never go stale on their own, so there is no policy involvement.
pub struct LocalImageDataLoader<S> {
  store: S,
}

impl<S: ImageDataStore> LocalImageDataLoader<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }
}

#[async_trait]
impl<S: ImageDataStore> ImageDataLoader for LocalImageDataLoader<S> {
  async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    match self.store.retrieve(url).await {
      Ok(Some(data)) => Ok(data),
      Ok(None) => Err(LoadError::NotFound),
      Err(err) => Err(err.into()),
    }
  }
}

#[async_trait]
impl<S: ImageDataStore> ImageDataCache for LocalImageDataLoader<S> {
  async fn save(&self, data: &[u8], url: &Url) -> Result<(), StoreError> {
    self.store.insert(data.to_vec(), url).await
  }
}
