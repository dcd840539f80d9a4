//! Generic composition strategies: primary/fallback substitution and
//! write-through cache decoration. Each composite implements both the feed
//! and image loading contracts, so one type serves both pipelines.

mod decorator;
mod fallback;

pub use decorator::CachingDecorator;
pub use fallback::FallbackLoader;
