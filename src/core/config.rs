use crate::core::retry::RetryConfig;
use crate::store::SCRAPER_USER_ID;
use crate::{ScraperError, ScraperResult};
use log::debug;
use std::env;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://quotes.toscrape.com/";
pub const DEFAULT_MAX_PAGES: usize = 1000;
pub const DEFAULT_MAX_AUTHOR_DEPTH: usize = 3;

/// Settings for a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub start_path: String,
    pub max_pages: usize,
    pub max_author_depth: usize,
    pub retry_config: RetryConfig,
    pub headers: Vec<(String, String)>,
    pub scraper_user_id: i64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            start_path: "/".to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            max_author_depth: DEFAULT_MAX_AUTHOR_DEPTH,
            retry_config: RetryConfig::standard(),
            headers: Vec::new(),
            scraper_user_id: SCRAPER_USER_ID,
        }
    }
}

impl ScrapeConfig {
    /// Defaults overridden by `QUOTES_BASE_URL`, `QUOTES_MAX_PAGES` and
    /// `QUOTES_SCRAPER_USER_ID` when set.
    pub fn from_env() -> ScraperResult<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("QUOTES_BASE_URL") {
            config = config.with_base_url(Url::parse(&base_url)?);
        }
        if let Some(max_pages) = parse_var::<usize>("QUOTES_MAX_PAGES")? {
            config = config.with_max_pages(max_pages);
        }
        if let Some(user_id) = parse_var::<i64>("QUOTES_SCRAPER_USER_ID")? {
            config = config.with_scraper_user_id(user_id);
        }

        debug!("Loaded scrape config: {:?}", config);
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_start_path(mut self, path: impl Into<String>) -> Self {
        self.start_path = path.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_author_depth(mut self, depth: usize) -> Self {
        self.max_author_depth = depth;
        self
    }

    pub fn with_retry(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn with_headers<K: Into<String>, V: Into<String>>(mut self, headers: Vec<(K, V)>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_scraper_user_id(mut self, user_id: i64) -> Self {
        self.scraper_user_id = user_id;
        self
    }
}

fn parse_var<T: FromStr>(name: &str) -> ScraperResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ScraperError::ConfigError(format!("{name}={raw:?}: {e}"))),
        Err(_) => Ok(None),
    }
}
