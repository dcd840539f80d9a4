//! Feed domain: item type, loading contract, remote loader and mapper.

pub mod mapper;
pub mod remote;
mod types;

pub use remote::RemoteFeedLoader;
pub use types::FeedItem;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::LoadError;

/// Anything that can produce the current feed items.
///
/// Implemented by the remote loader, the local cache loader, and the generic
/// composites that combine them.
#[async_trait]
pub trait FeedLoader: Send + Sync {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError>;
}

#[async_trait]
impl<T: FeedLoader + ?Sized> FeedLoader for Arc<T> {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    (**self).load().await
  }
}

#[async_trait]
impl<T: FeedLoader + ?Sized> FeedLoader for &T {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    (**self).load().await
  }
}
