//! Remote feed loading over the paginated feed endpoint.

use async_trait::async_trait;
use url::Url;

use crate::error::LoadError;
use crate::feed::{mapper, FeedItem, FeedLoader};
use crate::http::HttpClient;

/// Fixed page size requested from the feed endpoint.
pub const PAGE_SIZE: usize = 10;

/// Loads feed pages from `{base}/v1/feed?limit=10[&after_id={id}]`.
///
/// `load()` fetches the first page; `load_after` fetches the page following
/// the given item id. Each call performs an independent network fetch.
pub struct RemoteFeedLoader<H> {
  http: H,
  base_url: Url,
}

impl<H: HttpClient> RemoteFeedLoader<H> {
  pub fn new(http: H, base_url: Url) -> Self {
    Self { http, base_url }
  }

  /// Fetches the page after the item with id `after_id`.
  pub async fn load_after(&self, after_id: &str) -> Result<Vec<FeedItem>, LoadError> {
    self.get_page(Some(after_id)).await
  }

  async fn get_page(&self, after_id: Option<&str>) -> Result<Vec<FeedItem>, LoadError> {
    let url = self.endpoint(after_id)?;
    let response = self.http.get(&url).await?;
    mapper::map(&response)
  }

  fn endpoint(&self, after_id: Option<&str>) -> Result<Url, LoadError> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| LoadError::InvalidData)?
      .pop_if_empty()
      .extend(["v1", "feed"]);

    {
      let mut query = url.query_pairs_mut();
      query.append_pair("limit", &PAGE_SIZE.to_string());
      if let Some(id) = after_id {
        query.append_pair("after_id", id);
      }
    }

    Ok(url)
  }
}

#[async_trait]
impl<H: HttpClient> FeedLoader for RemoteFeedLoader<H> {
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    self.get_page(None).await
  }
}
