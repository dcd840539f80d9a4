//! Image comments: the same fetch-and-map pipeline shape as the feed, for
//! the per-image comments endpoint. Comments are not cached.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::LoadError;
use crate::http::{HttpClient, HttpResponse};

/// A comment attached to a feed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageComment {
  pub id: String,
  pub message: String,
  pub created_at: DateTime<Utc>,
  pub username: String,
}

#[derive(Deserialize)]
struct Root {
  items: Vec<RemoteComment>,
}

#[derive(Deserialize)]
struct RemoteComment {
  id: String,
  message: String,
  created_at: DateTime<Utc>,
  author: RemoteAuthor,
}

#[derive(Deserialize)]
struct RemoteAuthor {
  username: String,
}

/// Decodes a comments response. Unlike the feed endpoint, any 2xx status is
/// accepted.
pub fn map(response: &HttpResponse) -> Result<Vec<ImageComment>, LoadError> {
  if !(200..300).contains(&response.status) {
    return Err(LoadError::InvalidData);
  }

  let root: Root = serde_json::from_slice(&response.body).map_err(|_| LoadError::InvalidData)?;

  Ok(
    root
      .items
      .into_iter()
      .map(|c| ImageComment {
        id: c.id,
        message: c.message,
        created_at: c.created_at,
        username: c.author.username,
      })
      .collect(),
  )
}

/// Loads the comments for a single image from
/// `{base}/v1/image/{id}/comments`.
pub struct RemoteCommentsLoader<H> {
  http: H,
  base_url: Url,
}

impl<H: HttpClient> RemoteCommentsLoader<H> {
  pub fn new(http: H, base_url: Url) -> Self {
    Self { http, base_url }
  }

  pub async fn load(&self, image_id: &str) -> Result<Vec<ImageComment>, LoadError> {
    let url = self.endpoint(image_id)?;
    let response = self.http.get(&url).await?;
    map(&response)
  }

  fn endpoint(&self, image_id: &str) -> Result<Url, LoadError> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| LoadError::InvalidData)?
      .pop_if_empty()
      .extend(["v1", "image", image_id, "comments"]);
    Ok(url)
  }
}
