use crate::core::orchestrator::{Orchestrator, RunSummary};
use crate::{ScraperError, ScraperResult};
use log::{error, info};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub type JobId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running { page: String, pages_done: usize },
    Succeeded { summary: RunSummary },
    Failed { page: Option<String>, error: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Succeeded { .. } | JobStatus::Failed { .. })
    }
}

type StatusMap = Arc<RwLock<HashMap<JobId, JobStatus>>>;

/// Background queue running scrape jobs one at a time.
///
/// Jobs carry no parameters: each one is a full run of the shared
/// orchestrator against its configured base URL.
pub struct JobQueue {
    sender: mpsc::UnboundedSender<JobId>,
    statuses: StatusMap,
    worker: JoinHandle<()>,
}

impl JobQueue {
    /// Spawns the worker on the current tokio runtime.
    pub fn start(orchestrator: Arc<Orchestrator>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let statuses: StatusMap = Arc::new(RwLock::new(HashMap::new()));
        let worker = tokio::spawn(run_worker(orchestrator, receiver, statuses.clone()));

        Self {
            sender,
            statuses,
            worker,
        }
    }

    pub fn enqueue(&self) -> ScraperResult<JobId> {
        let id = Uuid::now_v7();
        self.statuses.write().insert(id, JobStatus::Pending);

        if self.sender.send(id).is_err() {
            self.statuses.write().remove(&id);
            return Err(ScraperError::QueueClosed);
        }

        info!("Enqueued scrape job {}", id);
        Ok(id)
    }

    pub fn status(&self, id: &JobId) -> Option<JobStatus> {
        self.statuses.read().get(id).cloned()
    }

    /// Polls until the job finishes. `None` for an unknown id.
    pub async fn wait(&self, id: JobId, poll: Duration) -> Option<JobStatus> {
        loop {
            let status = self.status(&id)?;
            if status.is_finished() {
                return Some(status);
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Stops accepting jobs and waits for queued ones to drain.
    pub async fn shutdown(self) {
        drop(self.sender);
        if let Err(e) = self.worker.await {
            error!("Job worker terminated abnormally: {}", e);
        }
    }
}

async fn run_worker(
    orchestrator: Arc<Orchestrator>,
    mut receiver: mpsc::UnboundedReceiver<JobId>,
    statuses: StatusMap,
) {
    while let Some(id) = receiver.recv().await {
        info!("Starting scrape job {}", id);
        statuses.write().insert(
            id,
            JobStatus::Running {
                page: orchestrator.config().start_path.clone(),
                pages_done: 0,
            },
        );

        let progress = {
            let statuses = statuses.clone();
            move |pages_done: usize, page: &str| {
                statuses.write().insert(
                    id,
                    JobStatus::Running {
                        page: page.to_string(),
                        pages_done,
                    },
                );
            }
        };

        // Each run gets its own task so a panic ends the job, not the worker.
        let run = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.run_scrape_reporting(progress).await }
        });

        let status = match run.await {
            Ok(Ok(summary)) => {
                info!("Scrape job {} succeeded", id);
                JobStatus::Succeeded { summary }
            }
            Ok(Err(e)) => {
                error!("Scrape job {} failed: {}", id, e);
                let page = match &e {
                    ScraperError::PageFailed { page, .. } => Some(page.clone()),
                    _ => None,
                };
                JobStatus::Failed {
                    page,
                    error: e.to_string(),
                }
            }
            Err(e) => {
                error!("Scrape job {} aborted: {}", id, e);
                JobStatus::Failed {
                    page: None,
                    error: format!("job aborted: {e}"),
                }
            }
        };
        statuses.write().insert(id, status);
    }

    info!("Job queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::core::config::ScrapeConfig;
    use crate::core::retry::RetryConfig;
    use crate::parser::fixtures::{url, BASE, EINSTEIN, SINGLE_PAGE};
    use crate::scrapers::{CachedFetcher, MockScraper};
    use crate::store::{
        Author, NewAuthor, NewQuote, Quote, QuoteRepository, SqliteStore, StoreCounts, Tag,
    };
    use async_trait::async_trait;
    use url::Url;

    fn queue_with(scraper: MockScraper, repo: Arc<dyn QuoteRepository>) -> JobQueue {
        let config = ScrapeConfig::default()
            .with_base_url(Url::parse(BASE).unwrap())
            .with_retry(RetryConfig::default());
        let fetcher = CachedFetcher::new(Arc::new(scraper), Arc::new(MemoryCache::new()));
        JobQueue::start(Arc::new(Orchestrator::new(config, Arc::new(fetcher), repo)))
    }

    async fn queue(scraper: MockScraper) -> JobQueue {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        queue_with(scraper, store)
    }

    /// Repository whose tag inserts blow up.
    struct PanickingTags(SqliteStore);

    #[async_trait]
    impl QuoteRepository for PanickingTags {
        async fn find_author_by_name(&self, fullname: &str) -> ScraperResult<Option<Author>> {
            self.0.find_author_by_name(fullname).await
        }
        async fn find_tag_by_word(&self, word: &str) -> ScraperResult<Option<Tag>> {
            self.0.find_tag_by_word(word).await
        }
        async fn find_quote_by_text(&self, text: &str) -> ScraperResult<Option<Quote>> {
            self.0.find_quote_by_text(text).await
        }
        async fn insert_author_if_absent(&self, author: &NewAuthor) -> ScraperResult<bool> {
            self.0.insert_author_if_absent(author).await
        }
        async fn insert_tag_if_absent(
            &self,
            word: &str,
            _created_by: i64,
        ) -> ScraperResult<bool> {
            panic!("tag table unavailable for {word}");
        }
        async fn insert_quote_if_absent(&self, quote: &NewQuote) -> ScraperResult<bool> {
            self.0.insert_quote_if_absent(quote).await
        }
        async fn tags_for_quote(&self, quote_id: i64) -> ScraperResult<Vec<Tag>> {
            self.0.tags_for_quote(quote_id).await
        }
        async fn counts(&self) -> ScraperResult<StoreCounts> {
            self.0.counts().await
        }
    }

    #[tokio::test]
    async fn test_job_runs_to_success() {
        let scraper = MockScraper::new()
            .with_page(&url("/"), SINGLE_PAGE)
            .with_page(&url("/author/Albert-Einstein"), EINSTEIN);
        let queue = queue(scraper).await;

        let id = queue.enqueue().unwrap();
        assert!(queue.status(&id).is_some());

        match queue.wait(id, Duration::from_millis(5)).await {
            Some(JobStatus::Succeeded { summary }) => {
                assert_eq!(summary.quotes_inserted, 2);
                assert_eq!(summary.authors_inserted, 1);
            }
            other => panic!("expected success, got {other:?}"),
        }
        queue.shutdown().await;
    }

    #[tokio::test]
    async fn test_jobs_run_in_order() {
        let scraper = MockScraper::new()
            .with_page(&url("/"), SINGLE_PAGE)
            .with_page(&url("/author/Albert-Einstein"), EINSTEIN);
        let queue = queue(scraper).await;

        let first = queue.enqueue().unwrap();
        let second = queue.enqueue().unwrap();

        let second_status = queue.wait(second, Duration::from_millis(5)).await;
        assert!(queue.status(&first).unwrap().is_finished());
        match second_status {
            Some(JobStatus::Succeeded { summary }) => assert_eq!(summary.quotes_inserted, 0),
            other => panic!("expected success, got {other:?}"),
        }
        queue.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_job_reports_page() {
        // Nothing registered: the start page answers 404.
        let queue = queue(MockScraper::new()).await;

        let id = queue.enqueue().unwrap();
        match queue.wait(id, Duration::from_millis(5)).await {
            Some(JobStatus::Failed { page, error }) => {
                assert_eq!(page.as_deref(), Some("/"));
                assert!(error.contains("404"), "error was {error}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        queue.shutdown().await;
    }

    #[tokio::test]
    async fn test_panicking_job_is_reported_failed_and_worker_survives() {
        let scraper = MockScraper::new()
            .with_page(&url("/"), SINGLE_PAGE)
            .with_page(&url("/author/Albert-Einstein"), EINSTEIN);
        let store = SqliteStore::in_memory().await.unwrap();
        let queue = queue_with(scraper, Arc::new(PanickingTags(store)));

        let first = queue.enqueue().unwrap();
        let second = queue.enqueue().unwrap();

        for id in [first, second] {
            let status = tokio::time::timeout(
                Duration::from_secs(5),
                queue.wait(id, Duration::from_millis(5)),
            )
            .await
            .expect("job never reached a final state");

            match status {
                Some(JobStatus::Failed { page, error }) => {
                    assert_eq!(page, None);
                    assert!(error.contains("panic"), "error was {error}");
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }
        queue.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_job_has_no_status() {
        let queue = queue(MockScraper::new()).await;
        assert!(queue.status(&Uuid::now_v7()).is_none());
        assert!(queue.wait(Uuid::now_v7(), Duration::from_millis(1)).await.is_none());
        queue.shutdown().await;
    }
}
