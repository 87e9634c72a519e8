use crate::core::retry::RetryCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] sqlx::Error),

    #[error("Failed to decode response body from {url}: {reason}")]
    DecodingError { url: String, reason: String },

    #[error("Invalid selector {0}")]
    SelectorError(String),

    #[error("Malformed page {url}: {reason}")]
    MalformedPage { url: String, reason: String },

    #[error("Tag {word:?} referenced by quote {quote:?} does not exist")]
    MissingTag { quote: String, word: String },

    #[error("Unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error(
        "Maximum retries reached for {url} (category: {category:?}, attempts: {attempts}): \
         {last_error}"
    )]
    MaxRetriesReached {
        url: String,
        category: RetryCategory,
        attempts: usize,
        last_error: String,
    },

    #[error("Scrape aborted at page {page}: {source}")]
    PageFailed {
        page: String,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Job queue is closed")]
    QueueClosed,
}

impl ScraperError {
    /// Errors confined to a single page. The orchestrator logs and skips the
    /// page instead of aborting the run.
    pub fn is_page_local(&self) -> bool {
        matches!(
            self,
            ScraperError::MalformedPage { .. }
                | ScraperError::UnexpectedStatus { .. }
                | ScraperError::DecodingError { .. }
        )
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;
