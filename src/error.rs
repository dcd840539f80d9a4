//! Error taxonomy for the loading pipeline.
//!
//! Cancellation is deliberately absent: a cancelled load is silence, not an
//! error. The adapter withholds its completion notification instead of
//! surfacing a variant (see `adapter`).

use thiserror::Error;

/// Failure of a persistent store operation.
///
/// The engine behind the store contract is caller-supplied, so the cause is
/// carried as a message rather than a concrete engine error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store failure: {0}")]
pub struct StoreError(pub String);

impl StoreError {
  pub fn new(message: impl Into<String>) -> Self {
    StoreError(message.into())
  }
}

/// Errors surfaced by loaders to their immediate caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
  /// Transport-level failure reaching the server.
  #[error("could not connect to the server")]
  Connectivity,

  /// Malformed or unexpected response (including non-OK status codes).
  #[error("the server returned invalid data")]
  InvalidData,

  /// Persistence read/write failure.
  #[error("store failure: {0}")]
  Store(String),

  /// Requested image bytes are absent from the local cache.
  #[error("image data not found in the cache")]
  NotFound,
}

impl From<StoreError> for LoadError {
  fn from(err: StoreError) -> Self {
    LoadError::Store(err.0)
  }
}
