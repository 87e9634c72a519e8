use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, ClientBuilder};
use std::collections::HashMap;
use thiserror::Error;

use super::Scraper;
use crate::core::retry::RetryConfig;
use crate::http::HttpRequest;
use crate::HttpResponse;
use crate::{ScraperError, ScraperResult, StatsTracker};

const DEFAULT_USER_AGENT: &str = concat!("quotescraper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum HttpScraperError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] header::InvalidHeaderName),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}

#[derive(Clone)]
pub struct HttpScraper {
    client: Client,
    retry_config: RetryConfig,
    stats: StatsTracker,
}

impl HttpScraper {
    pub fn new() -> Result<Self, HttpScraperError> {
        let client = ClientBuilder::new()
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            retry_config: RetryConfig::default(),
            stats: StatsTracker::new(),
        })
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Result<Self, HttpScraperError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut header_map = header::HeaderMap::new();
        header_map.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(DEFAULT_USER_AGENT),
        );

        for (key, value) in headers {
            let name = header::HeaderName::from_bytes(key.as_ref().as_bytes())?;
            let value = header::HeaderValue::from_str(value.as_ref())?;
            header_map.insert(name, value);
        }

        self.client = ClientBuilder::new().default_headers(header_map).build()?;

        Ok(self)
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn with_stats(mut self, stats: StatsTracker) -> Self {
        self.stats = stats;
        self
    }

    fn extract_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.to_string(), val.to_string())))
            .collect()
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn fetch_single(&self, request: &HttpRequest) -> ScraperResult<HttpResponse> {
        let mut req = self.client.get(request.url.clone());

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        let timestamp = Utc::now();
        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(&response);
        let raw_body = response.bytes().await?;

        let body =
            String::from_utf8(raw_body.to_vec()).map_err(|e| ScraperError::DecodingError {
                url: request.url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(HttpResponse {
            url: request.url.clone(),
            status,
            headers,
            body,
            timestamp,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::{
        BackoffPolicy, CategoryConfig, NetworkRetryCondition, RetryCategory, RetryCondition,
    };
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> Result<(HttpScraper, MockServer), HttpScraperError> {
        let server = MockServer::start().await;
        let scraper = HttpScraper::new()?;
        Ok((scraper, server))
    }

    #[tokio::test]
    async fn test_get_request() {
        let (scraper, mock_server) = setup().await.unwrap();

        Mock::given(method("GET"))
            .and(path("/page/1/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>quotes</body></html>", "text/html"),
            )
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri())
            .unwrap()
            .join("/page/1/")
            .unwrap();
        let response = scraper.fetch(HttpRequest::new(url)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<html><body>quotes</body></html>");
        assert_eq!(
            response.headers.get("content-type").map(String::as_str),
            Some("text/html")
        );
        assert!(!response.from_cache);
        assert_eq!(scraper.stats().get_stats().total_requests, 1);
    }

    #[tokio::test]
    async fn test_error_status_is_returned() {
        let (scraper, mock_server) = setup().await.unwrap();

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri())
            .unwrap()
            .join("/missing")
            .unwrap();
        let response = scraper.fetch(HttpRequest::new(url)).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "Not Found");
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_custom_headers() {
        let (scraper, mock_server) = setup().await.unwrap();
        let custom_ua = "CustomBot/1.0";
        let scraper = scraper
            .with_headers(vec![("user-agent", custom_ua)])
            .unwrap();

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", custom_ua))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri()).unwrap();
        let response = scraper.fetch(HttpRequest::new(url)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "ok");
    }

    #[tokio::test]
    async fn test_request_headers_are_sent() {
        let (scraper, mock_server) = setup().await.unwrap();

        Mock::given(method("GET"))
            .and(path("/author/Jane-Austen"))
            .and(header("accept-language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string("austen"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri())
            .unwrap()
            .join("/author/Jane-Austen")
            .unwrap();
        let request = HttpRequest::new(url).with_header("Accept-Language", "en");
        let response = scraper.fetch(request).await.unwrap();

        assert_eq!(response.body, "austen");
    }

    #[tokio::test]
    async fn test_invalid_headers() {
        let scraper = HttpScraper::new().unwrap();
        let result = scraper.with_headers(vec![("invalid\0header", "value")]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connection_failure_exhausts_retries() {
        let retry_config = RetryConfig::default().with_category(
            RetryCategory::Network,
            CategoryConfig {
                max_retries: 2,
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(5),
                backoff_policy: BackoffPolicy::Constant,
                conditions: vec![RetryCondition::Network(NetworkRetryCondition::Any)],
            },
        );
        let scraper = HttpScraper::new().unwrap().with_retry_config(retry_config);

        // Nothing listens on port 1.
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let result = scraper.fetch(HttpRequest::new(url)).await;

        match result {
            Err(ScraperError::MaxRetriesReached {
                category, attempts, ..
            }) => {
                assert_eq!(category, RetryCategory::Network);
                assert_eq!(attempts, 2);
            }
            other => panic!("expected MaxRetriesReached, got {:?}", other),
        }
        assert_eq!(scraper.stats().get_stats().network_errors, 3);
        assert_eq!(scraper.stats().get_stats().retry_count, 2);
    }
}
