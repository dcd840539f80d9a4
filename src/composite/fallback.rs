//! Primary-then-fallback loading strategy.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::LoadError;
use crate::feed::{FeedItem, FeedLoader};
use crate::image::ImageDataLoader;

/// Tries the primary loader; on any failure, tries the fallback exactly
/// once and returns ITS outcome. The primary's error is discarded and the
/// primary is never retried.
///
/// Cancellation reaches whichever leg is live: both legs are awaited inside
/// the caller's future, so dropping or aborting it drops the active leg.
pub struct FallbackLoader<P, F> {
  primary: P,
  fallback: F,
}

impl<P, F> FallbackLoader<P, F> {
  pub fn new(primary: P, fallback: F) -> Self {
    Self { primary, fallback }
  }
}

#[async_trait]
impl<P: FeedLoader, F: FeedLoader> FeedLoader for FallbackLoader<P, F> {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    match self.primary.load().await {
      Ok(items) => Ok(items),
      Err(err) => {
        debug!(error = %err, "primary feed load failed, using fallback");
        self.fallback.load().await
      }
    }
  }
}

#[async_trait]
impl<P: ImageDataLoader, F: ImageDataLoader> ImageDataLoader for FallbackLoader<P, F> {
  async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    match self.primary.load_image_data(url).await {
      Ok(data) => Ok(data),
      Err(err) => {
        debug!(error = %err, %url, "primary image load failed, using fallback");
        self.fallback.load_image_data(url).await
      }
    }
  }
}
