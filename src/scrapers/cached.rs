use crate::cache::ResponseCache;
use crate::http::CachedResponse;
use crate::{HttpRequest, HttpResponse, Scraper, ScraperError, ScraperResult, StatsTracker};
use log::info;
use std::sync::Arc;
use url::Url;

/// Fetches through a [`ResponseCache`]: a hit is served from the cache, a
/// miss goes to the network and successful responses are stored.
pub struct CachedFetcher {
    scraper: Arc<dyn Scraper>,
    cache: Arc<dyn ResponseCache>,
    stats: StatsTracker,
}

impl CachedFetcher {
    pub fn new(scraper: Arc<dyn Scraper>, cache: Arc<dyn ResponseCache>) -> Self {
        let stats = scraper.stats().clone();
        Self {
            scraper,
            cache,
            stats,
        }
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub async fn fetch(&self, url: &Url) -> ScraperResult<HttpResponse> {
        let key = url.as_str();

        if let Some(cached) = self.cache.get(key).await? {
            info!("Cache hit: {}", key);
            self.stats.record_cache_hit();
            return Ok(cached.into_response(url.clone()));
        }

        info!("Cache miss: {}", key);
        self.stats.record_cache_miss();

        let response = self.scraper.fetch(HttpRequest::new(url.clone())).await?;
        if !response.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                url: key.to_string(),
                status: response.status,
            });
        }

        self.cache.set(key, CachedResponse::from(&response)).await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::scrapers::{MockResponse, MockScraper};

    const ROOT: &str = "https://quotes.example/";

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let scraper = MockScraper::new().with_page(ROOT, "<html>root</html>");
        let fetcher = CachedFetcher::new(Arc::new(scraper.clone()), Arc::new(MemoryCache::new()));
        let url = Url::parse(ROOT).unwrap();

        let first = fetcher.fetch(&url).await.unwrap();
        let second = fetcher.fetch(&url).await.unwrap();

        assert_eq!(scraper.calls(ROOT), 1);
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.body, second.body);

        let stats = fetcher.stats().get_stats();
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
    }

    #[tokio::test]
    async fn test_failed_responses_are_not_cached() {
        let scraper = MockScraper::new().with_sequence(
            ROOT,
            vec![
                MockResponse::status(404, "Not Found"),
                MockResponse::ok("<html>root</html>"),
            ],
        );
        let cache = Arc::new(MemoryCache::new());
        let fetcher = CachedFetcher::new(Arc::new(scraper.clone()), cache.clone());
        let url = Url::parse(ROOT).unwrap();

        let error = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(
            error,
            ScraperError::UnexpectedStatus { status: 404, .. }
        ));
        assert!(cache.is_empty().await.unwrap());

        let response = fetcher.fetch(&url).await.unwrap();
        assert_eq!(response.body, "<html>root</html>");
        assert_eq!(scraper.calls(ROOT), 2);
    }
}
