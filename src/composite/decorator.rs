//! Write-through cache decoration.

use async_trait::async_trait;
use tracing::warn;
use url::Url;

use crate::cache::{FeedCache, ImageDataCache};
use crate::error::LoadError;
use crate::feed::{FeedItem, FeedLoader};
use crate::image::ImageDataLoader;

/// Wraps a loader and persists every successful result as a side effect.
///
/// The caller-visible result is always the wrapped loader's result: a
/// persist failure is logged and swallowed, never retried or surfaced, and
/// a load failure propagates untouched with no persist attempt.
pub struct CachingDecorator<L, C> {
  loader: L,
  cache: C,
}

impl<L, C> CachingDecorator<L, C> {
  pub fn new(loader: L, cache: C) -> Self {
    Self { loader, cache }
  }
}

#[async_trait]
impl<L: FeedLoader, C: FeedCache> FeedLoader for CachingDecorator<L, C> {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    let items = self.loader.load().await?;

    if let Err(err) = self.cache.save(&items).await {
      warn!(error = %err, "failed to cache loaded feed");
    }

    Ok(items)
  }
}

#[async_trait]
impl<L: ImageDataLoader, C: ImageDataCache> ImageDataLoader for CachingDecorator<L, C> {
  async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    let data = self.loader.load_image_data(url).await?;

    if let Err(err) = self.cache.save(&data, url).await {
      warn!(error = %err, %url, "failed to cache loaded image data");
    }

    Ok(data)
  }
}
