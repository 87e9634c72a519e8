use crate::core::config::ScrapeConfig;
use crate::core::discovery::LinkDiscoverer;
use crate::parser::{extract_authors, extract_quotes, extract_tags, QuoteRecord};
use crate::scrapers::CachedFetcher;
use crate::store::{PersistenceWriter, QuoteRepository, WriteOutcome};
use crate::{ScraperError, ScraperResult};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Counters for one scrape run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pages_processed: usize,
    pub pages_skipped: usize,
    pub authors_inserted: usize,
    pub tags_inserted: usize,
    pub quotes_inserted: usize,
    pub quotes_skipped: usize,
}

/// Runs a full scrape: pagination discovery, then per listing page the
/// authors, tags and quotes, in that order.
pub struct Orchestrator {
    config: ScrapeConfig,
    fetcher: Arc<CachedFetcher>,
    discoverer: LinkDiscoverer,
    writer: PersistenceWriter,
}

impl Orchestrator {
    pub fn new(
        config: ScrapeConfig,
        fetcher: Arc<CachedFetcher>,
        repo: Arc<dyn QuoteRepository>,
    ) -> Self {
        let discoverer = LinkDiscoverer::new(fetcher.clone())
            .with_max_pages(config.max_pages)
            .with_max_author_depth(config.max_author_depth);
        let writer = PersistenceWriter::new(repo).with_created_by(config.scraper_user_id);

        Self {
            config,
            fetcher,
            discoverer,
            writer,
        }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub async fn run_scrape(&self) -> ScraperResult<RunSummary> {
        self.run_scrape_reporting(|_, _| {}).await
    }

    /// Like [`run_scrape`](Self::run_scrape), calling `progress` with the
    /// number of pages done and the path about to be processed.
    pub async fn run_scrape_reporting<F>(&self, progress: F) -> ScraperResult<RunSummary>
    where
        F: Fn(usize, &str) + Send + Sync,
    {
        let base = &self.config.base_url;
        let start = &self.config.start_path;
        info!("Starting scrape of {}", base);

        let pages = self
            .discoverer
            .discover_quote_pages(base, start)
            .await
            .map_err(|source| ScraperError::PageFailed {
                page: start.clone(),
                source: Box::new(source),
            })?;

        let mut summary = RunSummary::default();
        for (done, page) in pages.iter().enumerate() {
            progress(done, page);
            match self.scrape_page(page, &mut summary).await {
                Ok(()) => summary.pages_processed += 1,
                Err(error) if error.is_page_local() => {
                    warn!("Skipping page {}: {}", page, error);
                    summary.pages_skipped += 1;
                }
                Err(error) => {
                    error!("Aborting scrape at {}: {}", page, error);
                    return Err(ScraperError::PageFailed {
                        page: page.clone(),
                        source: Box::new(error),
                    });
                }
            }
        }

        info!("Scrape finished: {:?}", summary);
        Ok(summary)
    }

    async fn scrape_page(&self, page: &str, summary: &mut RunSummary) -> ScraperResult<()> {
        let base = &self.config.base_url;
        let url = base.join(page)?;
        info!("Processing page {}", url);

        // Extract before writing anything so a malformed page leaves no trace.
        let response = self.fetcher.fetch(&url).await?;
        let quotes = extract_quotes(url.as_str(), &response.body)?;
        let tags = extract_tags(&response.body)?;

        let author_paths = self
            .discoverer
            .discover_author_links(base, &[page.to_string()])
            .await?;
        for path in &author_paths {
            self.scrape_author(path, summary).await?;
        }

        for word in &tags {
            if self.writer.write_tag(word).await? == WriteOutcome::Inserted {
                summary.tags_inserted += 1;
            }
        }

        for quote in &quotes {
            self.store_quote(quote, summary).await?;
        }

        debug!(
            "Page {} done: {} authors, {} tags, {} quotes seen",
            page,
            author_paths.len(),
            tags.len(),
            quotes.len()
        );
        Ok(())
    }

    async fn scrape_author(&self, path: &str, summary: &mut RunSummary) -> ScraperResult<()> {
        let url = self.config.base_url.join(path)?;
        let records = match self
            .fetcher
            .fetch(&url)
            .await
            .and_then(|response| extract_authors(url.as_str(), &response.body))
        {
            Ok(records) => records,
            Err(error) if error.is_page_local() => {
                warn!("Skipping author page {}: {}", url, error);
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        for record in &records {
            if self.writer.write_author(record).await? == WriteOutcome::Inserted {
                summary.authors_inserted += 1;
            }
        }
        Ok(())
    }

    async fn store_quote(
        &self,
        quote: &QuoteRecord,
        summary: &mut RunSummary,
    ) -> ScraperResult<()> {
        match self
            .writer
            .write_quote(&quote.text, &quote.author, &quote.tags)
            .await
        {
            Ok(WriteOutcome::Inserted) => summary.quotes_inserted += 1,
            Ok(WriteOutcome::Existing) => {}
            Ok(WriteOutcome::Skipped(reason)) => {
                debug!("Quote skipped ({:?}): {:?}", reason, quote.text);
                summary.quotes_skipped += 1;
            }
            Err(error @ ScraperError::MissingTag { .. }) => {
                warn!("Skipping quote: {}", error);
                summary.quotes_skipped += 1;
            }
            Err(error) => return Err(error),
        }
        Ok(())
    }
}
