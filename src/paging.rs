//! Cursor pagination model: a page of items plus an optional asynchronous
//! continuation producing the next page.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::LoadError;

/// Future returned by a load-more continuation.
pub type LoadMoreFuture<T> = Pin<Box<dyn Future<Output = Result<Paginated<T>, LoadError>> + Send>>;

type LoadMoreFn<T> = Arc<dyn Fn() -> LoadMoreFuture<T> + Send + Sync>;

/// An ordered page of items, optionally continuable.
///
/// A missing continuation means pagination has terminated. The continuation
/// is not memoized: invoking it twice performs two independent fetches.
pub struct Paginated<T> {
  pub items: Vec<T>,
  load_more: Option<LoadMoreFn<T>>,
}

impl<T> Paginated<T> {
  /// A terminal page with no continuation.
  pub fn new(items: Vec<T>) -> Self {
    Self {
      items,
      load_more: None,
    }
  }

  /// A page whose continuation invokes `load_more` for the next page.
  pub fn with_load_more(
    items: Vec<T>,
    load_more: impl Fn() -> LoadMoreFuture<T> + Send + Sync + 'static,
  ) -> Self {
    Self {
      items,
      load_more: Some(Arc::new(load_more)),
    }
  }

  pub fn has_more(&self) -> bool {
    self.load_more.is_some()
  }

  /// Fetches the next page, or `None` when pagination has terminated.
  pub async fn load_next(&self) -> Option<Result<Paginated<T>, LoadError>> {
    match &self.load_more {
      Some(load_more) => Some(load_more().await),
      None => None,
    }
  }
}

impl<T> Clone for Paginated<T>
where
  T: Clone,
{
  fn clone(&self) -> Self {
    Self {
      items: self.items.clone(),
      load_more: self.load_more.clone(),
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for Paginated<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Paginated")
      .field("items", &self.items)
      .field("has_more", &self.has_more())
      .finish_non_exhaustive()
  }
}
