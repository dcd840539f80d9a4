//! Production composition of the loading pipeline.
//!
//! Feed: network first, write-through into the local store, falling back to
//! the offline (policy-bypassing) local read on any network failure.
//! Images: cache first to save bandwidth, falling back to a write-through
//! network fetch on a miss or read failure.

use std::sync::Arc;
use tokio::try_join;
use tracing::warn;
use url::Url;

use crate::cache::{
  FeedCache, FeedStore, ImageDataStore, LocalFeedLoader, LocalImageDataLoader, OfflineFeedLoader,
};
use crate::comments::{ImageComment, RemoteCommentsLoader};
use crate::composite::{CachingDecorator, FallbackLoader};
use crate::error::{LoadError, StoreError};
use crate::feed::{FeedItem, FeedLoader, RemoteFeedLoader};
use crate::http::HttpClient;
use crate::image::{ImageDataLoader, RemoteImageDataLoader};
use crate::paging::Paginated;

/// The composed loading pipeline over an HTTP client and two store engines.
///
/// Cheap to clone; clones share the same stores and loaders.
pub struct FeedPipeline<H, F, I> {
  http: H,
  base_url: Url,
  local: Arc<LocalFeedLoader<Arc<F>>>,
  offline: Arc<OfflineFeedLoader<Arc<F>>>,
  local_images: Arc<LocalImageDataLoader<Arc<I>>>,
}

impl<H, F, I> FeedPipeline<H, F, I>
where
  H: HttpClient + Clone + 'static,
  F: FeedStore + 'static,
  I: ImageDataStore + 'static,
{
  pub fn new(http: H, base_url: Url, feed_store: Arc<F>, image_store: Arc<I>) -> Self {
    Self {
      http,
      base_url,
      local: Arc::new(LocalFeedLoader::new(Arc::clone(&feed_store))),
      offline: Arc::new(OfflineFeedLoader::new(feed_store)),
      local_images: Arc::new(LocalImageDataLoader::new(image_store)),
    }
  }

  /// Loads the first feed page: fresh from the network when reachable, the
  /// last cached snapshot (however old) when not.
  pub async fn load_feed(&self) -> Result<Paginated<FeedItem>, LoadError> {
    let primary = CachingDecorator::new(self.remote(), Arc::clone(&self.local));
    let loader = FallbackLoader::new(primary, Arc::clone(&self.offline));

    let items = loader.load().await?;
    let cursor = items.last().map(|item| item.id.clone());
    Ok(self.page(items, cursor))
  }

  /// Loads the raw bytes for an image, preferring the cache and persisting
  /// a successful network fetch.
  pub async fn load_image(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    let remote = CachingDecorator::new(
      RemoteImageDataLoader::new(self.http.clone()),
      Arc::clone(&self.local_images),
    );
    let loader = FallbackLoader::new(Arc::clone(&self.local_images), remote);

    loader.load_image_data(url).await
  }

  /// Loads the comments for an image. Comments are not cached.
  pub async fn load_comments(&self, image_id: &str) -> Result<Vec<ImageComment>, LoadError> {
    RemoteCommentsLoader::new(self.http.clone(), self.base_url.clone())
      .load(image_id)
      .await
  }

  /// Evicts the feed snapshot if it is stale or unreadable.
  pub async fn validate_cache(&self) -> Result<(), StoreError> {
    self.local.validate_cache().await
  }

  fn remote(&self) -> RemoteFeedLoader<H> {
    RemoteFeedLoader::new(self.http.clone(), self.base_url.clone())
  }

  /// Fetches the page after `cursor` and merges it into the running feed.
  ///
  /// The local read and the network fetch run concurrently and both must
  /// succeed; nothing is persisted on a partial result. The merged list
  /// replaces the snapshot wholesale, while the next cursor keeps pointing
  /// at the last NEWLY fetched item so pagination advances even though the
  /// snapshot now holds everything seen so far.
  async fn load_more(&self, cursor: String) -> Result<Paginated<FeedItem>, LoadError> {
    let remote = self.remote();
    let (mut items, newly) = try_join!(self.local.load(), remote.load_after(&cursor))?;

    let next_cursor = newly.last().map(|item| item.id.clone());
    items.extend(newly);

    if let Err(err) = self.local.save(&items).await {
      warn!(error = %err, "failed to cache merged feed page");
    }

    Ok(self.page(items, next_cursor))
  }

  fn page(&self, items: Vec<FeedItem>, cursor: Option<String>) -> Paginated<FeedItem> {
    match cursor {
      None => Paginated::new(items),
      Some(cursor) => {
        let pipeline = self.clone();
        Paginated::with_load_more(items, move || {
          let pipeline = pipeline.clone();
          let cursor = cursor.clone();
          Box::pin(async move { pipeline.load_more(cursor).await })
        })
      }
    }
  }
}

impl<H: Clone, F, I> Clone for FeedPipeline<H, F, I> {
  fn clone(&self) -> Self {
    Self {
      http: self.http.clone(),
      base_url: self.base_url.clone(),
      local: Arc::clone(&self.local),
      offline: Arc::clone(&self.offline),
      local_images: Arc::clone(&self.local_images),
    }
  }
}

impl<H, S> FeedPipeline<H, S, S>
where
  H: HttpClient + Clone + 'static,
  S: FeedStore + ImageDataStore + 'static,
{
  /// Composition over a single engine implementing both store contracts.
  pub fn with_shared_store(http: H, base_url: Url, store: Arc<S>) -> Self {
    Self::new(http, base_url, Arc::clone(&store), store)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::InMemoryStore;
  use crate::http::HttpResponse;
  use async_trait::async_trait;
  use chrono::{Duration, Utc};
  use std::collections::VecDeque;
  use std::sync::Mutex;

  #[derive(Clone, Default)]
  struct StubHttp {
    inner: Arc<StubInner>,
  }

  #[derive(Default)]
  struct StubInner {
    responses: Mutex<VecDeque<Result<HttpResponse, LoadError>>>,
    requests: Mutex<Vec<Url>>,
  }

  impl StubHttp {
    fn new(responses: Vec<Result<HttpResponse, LoadError>>) -> Self {
      Self {
        inner: Arc::new(StubInner {
          responses: Mutex::new(responses.into()),
          requests: Mutex::new(Vec::new()),
        }),
      }
    }

    fn requests(&self) -> Vec<Url> {
      self.inner.requests.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl HttpClient for StubHttp {
    async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError> {
      self.inner.requests.lock().unwrap().push(url.clone());
      self
        .inner
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(Err(LoadError::Connectivity))
    }
  }

  fn feed_page(ids: &[&str]) -> Result<HttpResponse, LoadError> {
    let items: Vec<String> = ids
      .iter()
      .map(|id| format!(r#"{{"id": "{}", "image": "https://example.com/{}.jpg"}}"#, id, id))
      .collect();
    Ok(HttpResponse {
      status: 200,
      body: format!(r#"{{"items": [{}]}}"#, items.join(",")).into_bytes(),
    })
  }

  fn item(id: &str) -> FeedItem {
    FeedItem::new(
      id,
      None,
      None,
      format!("https://example.com/{}.jpg", id).parse().unwrap(),
    )
  }

  fn ids(items: &[FeedItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
  }

  fn make_pipeline(
    http: StubHttp,
  ) -> (FeedPipeline<StubHttp, InMemoryStore, InMemoryStore>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let pipeline = FeedPipeline::with_shared_store(
      http,
      "https://api.example.com".parse().unwrap(),
      Arc::clone(&store),
    );
    (pipeline, store)
  }

  #[tokio::test]
  async fn test_first_page_caches_items_and_binds_continuation_to_last_id() {
    let http = StubHttp::new(vec![feed_page(&["a", "b"])]);
    let (pipeline, store) = make_pipeline(http.clone());

    let page = pipeline.load_feed().await.unwrap();

    assert_eq!(ids(&page.items), vec!["a", "b"]);
    assert!(page.has_more());

    let cached = FeedStore::retrieve(&*store).await.unwrap().unwrap();
    assert_eq!(ids(&cached.items), vec!["a", "b"]);
  }

  #[tokio::test]
  async fn test_empty_first_page_terminates_pagination() {
    let http = StubHttp::new(vec![feed_page(&[])]);
    let (pipeline, _store) = make_pipeline(http);

    let page = pipeline.load_feed().await.unwrap();

    assert!(page.items.is_empty());
    assert!(!page.has_more());
  }

  #[tokio::test]
  async fn test_load_more_concatenates_previous_then_new_and_advances() {
    let http = StubHttp::new(vec![
      feed_page(&["a", "b"]),
      feed_page(&["c"]),
      feed_page(&[]),
    ]);
    let (pipeline, store) = make_pipeline(http.clone());

    let first = pipeline.load_feed().await.unwrap();
    let second = first.load_next().await.unwrap().unwrap();

    assert_eq!(ids(&second.items), vec!["a", "b", "c"]);
    assert!(second.has_more());

    // The snapshot was replaced with the full concatenation.
    let cached = FeedStore::retrieve(&*store).await.unwrap().unwrap();
    assert_eq!(ids(&cached.items), vec!["a", "b", "c"]);

    // An empty page keeps the accumulated items and terminates.
    let third = second.load_next().await.unwrap().unwrap();
    assert_eq!(ids(&third.items), vec!["a", "b", "c"]);
    assert!(!third.has_more());

    let requested: Vec<String> = http.requests().iter().map(|u| u.to_string()).collect();
    assert_eq!(
      requested,
      vec![
        "https://api.example.com/v1/feed?limit=10",
        "https://api.example.com/v1/feed?limit=10&after_id=b",
        "https://api.example.com/v1/feed?limit=10&after_id=c",
      ]
    );
  }

  #[tokio::test]
  async fn test_failed_load_more_persists_nothing() {
    let http = StubHttp::new(vec![feed_page(&["a"]), Err(LoadError::Connectivity)]);
    let (pipeline, store) = make_pipeline(http);

    let first = pipeline.load_feed().await.unwrap();
    let result = first.load_next().await.unwrap();

    // Load-more fails as a whole; the snapshot stays at the first page.
    assert!(result.is_err());
    let cached = FeedStore::retrieve(&*store).await.unwrap().unwrap();
    assert_eq!(ids(&cached.items), vec!["a"]);
  }

  #[tokio::test]
  async fn test_load_more_is_not_memoized() {
    let http = StubHttp::new(vec![
      feed_page(&["a"]),
      feed_page(&["b"]),
      feed_page(&["b"]),
    ]);
    let (pipeline, _store) = make_pipeline(http.clone());

    let first = pipeline.load_feed().await.unwrap();
    first.load_next().await.unwrap().unwrap();
    first.load_next().await.unwrap().unwrap();

    // Three fetches: the first page plus one per load-more invocation,
    // both with the same cursor.
    let requested: Vec<String> = http.requests().iter().map(|u| u.to_string()).collect();
    assert_eq!(
      requested,
      vec![
        "https://api.example.com/v1/feed?limit=10",
        "https://api.example.com/v1/feed?limit=10&after_id=a",
        "https://api.example.com/v1/feed?limit=10&after_id=a",
      ]
    );
  }

  #[tokio::test]
  async fn test_offline_fallback_serves_snapshot_older_than_max_age() {
    let http = StubHttp::new(vec![Err(LoadError::Connectivity)]);
    let (pipeline, store) = make_pipeline(http);

    let stale = Utc::now() - Duration::days(30);
    FeedStore::insert(&*store, vec![item("old")], stale).await.unwrap();

    let page = pipeline.load_feed().await.unwrap();
    assert_eq!(ids(&page.items), vec!["old"]);
  }

  #[tokio::test]
  async fn test_image_load_prefers_cache_and_skips_network() {
    let http = StubHttp::new(vec![]);
    let (pipeline, store) = make_pipeline(http.clone());
    let url: Url = "https://example.com/a.jpg".parse().unwrap();

    ImageDataStore::insert(&*store, b"cached".to_vec(), &url).await.unwrap();

    assert_eq!(pipeline.load_image(&url).await.unwrap(), b"cached");
    assert!(http.requests().is_empty());
  }

  #[tokio::test]
  async fn test_image_cache_miss_fetches_and_persists() {
    let http = StubHttp::new(vec![Ok(HttpResponse {
      status: 200,
      body: b"remote bytes".to_vec(),
    })]);
    let (pipeline, _store) = make_pipeline(http.clone());
    let url: Url = "https://example.com/a.jpg".parse().unwrap();

    assert_eq!(pipeline.load_image(&url).await.unwrap(), b"remote bytes");

    // Second load is served from the cache written through on the miss.
    assert_eq!(pipeline.load_image(&url).await.unwrap(), b"remote bytes");
    assert_eq!(http.requests(), vec![url]);
  }

  #[tokio::test]
  async fn test_comments_load_through_the_same_transport() {
    let http = StubHttp::new(vec![Ok(HttpResponse {
      status: 200,
      body: br#"{"items": [{"id": "c1", "message": "hi", "created_at": "2026-01-01T00:00:00Z", "author": {"username": "bo"}}]}"#.to_vec(),
    })]);
    let (pipeline, _store) = make_pipeline(http.clone());

    let comments = pipeline.load_comments("a").await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].username, "bo");
    assert_eq!(
      http.requests(),
      vec!["https://api.example.com/v1/image/a/comments".parse().unwrap()]
    );
  }
}
