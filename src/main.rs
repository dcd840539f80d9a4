use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

use feedcache::cache::SqliteStore;
use feedcache::config::Config;
use feedcache::http::ReqwestHttpClient;
use feedcache::FeedPipeline;

#[derive(Parser, Debug)]
#[command(name = "feedcache")]
#[command(about = "Load a paginated media feed, caching it for offline use")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/feedcache/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Feed API base URL (bypasses the config file)
  #[arg(short, long)]
  url: Option<Url>,

  /// Number of pages to load
  #[arg(short, long, default_value_t = 1)]
  pages: usize,

  /// Evict a stale cache snapshot before loading
  #[arg(long)]
  validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();

  let config = match args.url {
    Some(url) => Config::with_base_url(url),
    None => Config::load(args.config.as_deref())?,
  };

  let store = Arc::new(match &config.cache.path {
    Some(path) => SqliteStore::open_at(path)?,
    None => SqliteStore::open()?,
  });

  let pipeline =
    FeedPipeline::with_shared_store(ReqwestHttpClient::new(), config.api.base_url, store);

  if args.validate {
    pipeline.validate_cache().await?;
  }

  let mut page = pipeline.load_feed().await?;
  for item in &page.items {
    print_item(item);
  }

  for _ in 1..args.pages {
    let next = match page.load_next().await {
      Some(result) => result?,
      None => break,
    };

    // Later pages accumulate everything seen so far; only show the tail.
    for item in &next.items[page.items.len()..] {
      print_item(item);
    }
    page = next;
  }

  Ok(())
}

fn print_item(item: &feedcache::FeedItem) {
  let description = item.description.as_deref().unwrap_or("-");
  let location = item.location.as_deref().unwrap_or("-");
  println!("{}\t{}\t{}\t{}", item.id, location, description, item.url);
}
