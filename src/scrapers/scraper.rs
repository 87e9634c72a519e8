use crate::core::retry::{RetryConfig, RetryDecision, RetryState};
use crate::{HttpRequest, HttpResponse, ScraperError, ScraperResult, StatsTracker};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::time::sleep;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Performs one outbound request, without retries.
    async fn fetch_single(&self, request: &HttpRequest) -> ScraperResult<HttpResponse>;
    fn retry_config(&self) -> &RetryConfig;
    fn stats(&self) -> &StatsTracker;

    async fn fetch(&self, request: HttpRequest) -> ScraperResult<HttpResponse> {
        let start_time = Utc::now();
        let mut state = RetryState::new();
        let url = request.url.clone();

        loop {
            info!("Fetching URL: {}", url);
            let (category, delay) = match self.fetch_single(&request).await {
                Ok(response) => {
                    debug!(
                        "Received response: status={}, body_length={}",
                        response.status,
                        response.body.len()
                    );

                    let duration = Utc::now().signed_duration_since(start_time);
                    self.stats()
                        .record_request(response.status, response.body.len(), duration);

                    match self.retry_config().should_retry_request(
                        &mut state,
                        response.status,
                        &response.body,
                    ) {
                        RetryDecision::Retry { category, delay } => (category, delay),
                        RetryDecision::Exhausted { category, attempts } => {
                            return Err(ScraperError::MaxRetriesReached {
                                url: url.to_string(),
                                category,
                                attempts,
                                last_error: format!("status {}", response.status),
                            });
                        }
                        RetryDecision::NoMatch => {
                            info!(
                                "Request completed for URL: {} (total_retries={}, status={})",
                                url, state.total_retries, response.status
                            );
                            debug!("Retry history for {}: {:?}", url, state.counts);

                            return Ok(HttpResponse {
                                retry_count: state.total_retries,
                                retry_history: state.counts,
                                ..response
                            });
                        }
                    }
                }
                Err(error) => {
                    self.stats().record_network_error();

                    match self.retry_config().should_retry_error(&mut state, &error) {
                        RetryDecision::Retry { category, delay } => {
                            debug!("Request to {} failed: {}", url, error);
                            (category, delay)
                        }
                        RetryDecision::Exhausted { category, attempts } => {
                            return Err(ScraperError::MaxRetriesReached {
                                url: url.to_string(),
                                category,
                                attempts,
                                last_error: error.to_string(),
                            });
                        }
                        RetryDecision::NoMatch => return Err(error),
                    }
                }
            };

            self.stats().record_retry(format!("{:?}", category));
            warn!(
                "Retry triggered for URL: {} (category={:?}, attempt={}, delay={:?})",
                url,
                category,
                state.counts.get(&category).copied().unwrap_or(0),
                delay
            );

            sleep(delay).await;
        }
    }
}
