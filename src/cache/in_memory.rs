//! In-memory store engine. Useful for tests and ephemeral setups where the
//! offline cache should not outlive the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use url::Url;

use super::feed_store::{CachedFeed, FeedStore};
use super::image_store::ImageDataStore;
use crate::error::StoreError;
use crate::feed::FeedItem;

/// Mutex-serialized in-memory implementation of both store contracts.
#[derive(Default)]
pub struct InMemoryStore {
  feed: Mutex<Option<CachedFeed>>,
  images: Mutex<HashMap<Url, Vec<u8>>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
  mutex
    .lock()
    .map_err(|e| StoreError::new(format!("lock poisoned: {}", e)))
}

#[async_trait]
impl FeedStore for InMemoryStore {
  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    Ok(lock(&self.feed)?.clone())
  }

  async fn insert(&self, items: Vec<FeedItem>, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
    *lock(&self.feed)? = Some(CachedFeed { items, timestamp });
    Ok(())
  }

  async fn delete(&self) -> Result<(), StoreError> {
    *lock(&self.feed)? = None;
    Ok(())
  }
}

#[async_trait]
impl ImageDataStore for InMemoryStore {
  async fn retrieve(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError> {
    Ok(lock(&self.images)?.get(url).cloned())
  }

  async fn insert(&self, data: Vec<u8>, url: &Url) -> Result<(), StoreError> {
    lock(&self.images)?.insert(url.clone(), data);
    Ok(())
  }
}
