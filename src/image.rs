//! Image data loading contract and remote loader.

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::error::LoadError;
use crate::http::{HttpClient, HttpResponse};

/// Anything that can produce the raw bytes for an image URL.
#[async_trait]
pub trait ImageDataLoader: Send + Sync {
  async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError>;
}

#[async_trait]
impl<T: ImageDataLoader + ?Sized> ImageDataLoader for Arc<T> {
  async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    (**self).load_image_data(url).await
  }
}

#[async_trait]
impl<T: ImageDataLoader + ?Sized> ImageDataLoader for &T {
  async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    (**self).load_image_data(url).await
  }
}

/// Decodes an image response: status 200 with a non-empty body, or invalid
/// data. The image endpoint is a bare URL, so there is nothing else to
/// interpret.
pub fn map(response: HttpResponse) -> Result<Vec<u8>, LoadError> {
  if response.status != 200 || response.body.is_empty() {
    return Err(LoadError::InvalidData);
  }
  Ok(response.body)
}

/// Fetches image bytes straight from their canonical URL.
pub struct RemoteImageDataLoader<H> {
  http: H,
}

impl<H: HttpClient> RemoteImageDataLoader<H> {
  pub fn new(http: H) -> Self {
    Self { http }
  }
}

#[async_trait]
impl<H: HttpClient> ImageDataLoader for RemoteImageDataLoader<H> {
  async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    let response = self.http.get(url).await?;
    map(response)
  }
}
