//! Maps raw feed endpoint responses into domain items.

use serde::Deserialize;
use url::Url;

use crate::error::LoadError;
use crate::feed::FeedItem;
use crate::http::HttpResponse;

const OK_200: u16 = 200;

#[derive(Deserialize)]
struct Root {
  items: Vec<RemoteFeedItem>,
}

/// Wire representation of a feed item, as the endpoint serves it.
#[derive(Deserialize)]
struct RemoteFeedItem {
  id: String,
  description: Option<String>,
  location: Option<String>,
  image: Url,
}

impl RemoteFeedItem {
  fn into_item(self) -> FeedItem {
    FeedItem {
      id: self.id,
      description: self.description,
      location: self.location,
      url: self.image,
    }
  }
}

/// Decodes a feed page. The feed endpoint is strict: anything other than
/// status 200 with a well-formed `items` payload is invalid data, regardless
/// of the body.
pub fn map(response: &HttpResponse) -> Result<Vec<FeedItem>, LoadError> {
  if response.status != OK_200 {
    return Err(LoadError::InvalidData);
  }

  let root: Root = serde_json::from_slice(&response.body).map_err(|_| LoadError::InvalidData)?;

  Ok(root.items.into_iter().map(RemoteFeedItem::into_item).collect())
}
