//! Offline-first cached feed loading.
//!
//! The pipeline fetches a paginated media feed over HTTP, writes successful
//! results through to a local store, and transparently serves the last
//! cached snapshot when the network is unreachable. Image bytes get the
//! inverse treatment: cache first, network on a miss. A concurrency-safe
//! adapter bridges load requests to presenter notifications with
//! de-duplication and cancellation.

pub mod adapter;
pub mod cache;
pub mod comments;
pub mod composite;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod image;
pub mod paging;
pub mod pipeline;

pub use adapter::{LoadAdapter, ResourcePresenter};
pub use error::{LoadError, StoreError};
pub use feed::{FeedItem, FeedLoader};
pub use paging::Paginated;
pub use pipeline::FeedPipeline;
