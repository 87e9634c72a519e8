use anyhow::Context;
use log::info;
use quotescraper::cache::SqliteCache;
use quotescraper::scrapers::{CachedFetcher, HttpScraper};
use quotescraper::store::{QuoteRepository, SqliteStore};
use quotescraper::{JobQueue, JobStatus, Orchestrator, ScrapeConfig, StatsTracker};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://quotes.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .parse_default_env()
        .init();

    let config = ScrapeConfig::from_env()?.with_headers(vec![(
        "Accept",
        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
    )]);
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let store = SqliteStore::connect(&database_url)
        .await
        .with_context(|| format!("opening database {database_url}"))?;
    let cache = SqliteCache::open(store.pool().clone()).await?;

    let stats = StatsTracker::new();
    let scraper = HttpScraper::new()?
        .with_headers(config.headers.clone())?
        .with_retry_config(config.retry_config.clone())
        .with_stats(stats.clone());
    let fetcher = CachedFetcher::new(Arc::new(scraper), Arc::new(cache));

    let store = Arc::new(store);
    let orchestrator = Orchestrator::new(config, Arc::new(fetcher), store.clone());
    let queue = JobQueue::start(Arc::new(orchestrator));

    let job = queue.enqueue()?;
    info!("Waiting for job {}", job);
    let status = queue
        .wait(job, Duration::from_millis(250))
        .await
        .context("job disappeared from the queue")?;
    queue.shutdown().await;

    stats.finish();
    stats.print_summary();

    let counts = store.counts().await?;
    info!(
        "Store holds {} authors, {} tags, {} quotes",
        counts.authors, counts.tags, counts.quotes
    );
    println!("{}", serde_json::to_string_pretty(&status)?);

    match status {
        JobStatus::Failed { error, .. } => anyhow::bail!(error),
        _ => Ok(()),
    }
}
