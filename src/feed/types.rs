use serde::{Deserialize, Serialize};
use url::Url;

/// A single item in the media feed.
///
/// Identity is the `id`; equality compares all fields. Items are immutable
/// values, cloned freely between the remote, cache, and presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
  pub id: String,
  pub description: Option<String>,
  pub location: Option<String>,
  /// Canonical URL for fetching this item's image bytes.
  pub url: Url,
}

impl FeedItem {
  pub fn new(
    id: impl Into<String>,
    description: Option<String>,
    location: Option<String>,
    url: Url,
  ) -> Self {
    Self {
      id: id.into(),
      description,
      location,
      url,
    }
  }
}
