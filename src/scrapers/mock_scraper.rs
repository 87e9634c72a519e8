use crate::core::retry::RetryConfig;
use crate::{HttpRequest, HttpResponse, ScraperResult, StatsTracker};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::Scraper;

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    /// Holds the response back for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Serves canned responses keyed by exact URL and counts every call.
///
/// A URL registered with a sequence answers with the next entry on each call
/// and keeps repeating the last one. Unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct MockScraper {
    retry_config: RetryConfig,
    responses: Arc<HashMap<String, Vec<MockResponse>>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
    stats: StatsTracker,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, body: impl Into<String>) -> Self {
        self.with_sequence(url, vec![MockResponse::ok(body)])
    }

    pub fn with_sequence(mut self, url: &str, responses: Vec<MockResponse>) -> Self {
        Arc::make_mut(&mut self.responses).insert(url.to_string(), responses);
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn with_stats(mut self, stats: StatsTracker) -> Self {
        self.stats = stats;
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn fetch_single(&self, request: &HttpRequest) -> ScraperResult<HttpResponse> {
        let key = request.url.to_string();
        let index = {
            let mut calls = self.calls.lock();
            let count = calls.entry(key.clone()).or_insert(0);
            *count += 1;
            *count - 1
        };

        let response = self
            .responses
            .get(&key)
            .and_then(|sequence| sequence.get(index).or_else(|| sequence.last()))
            .cloned()
            .unwrap_or_else(|| MockResponse::status(404, "Not Found"));

        if let Some(delay) = response.delay {
            sleep(delay).await;
        }

        Ok(HttpResponse {
            url: request.url.clone(),
            status: response.status,
            headers: HashMap::new(),
            body: response.body,
            timestamp: Utc::now(),
            retry_count: 0,
            retry_history: HashMap::new(),
            from_cache: false,
        })
    }

    fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    fn stats(&self) -> &StatsTracker {
        &self.stats
    }
}
