use crate::ScraperError;

use super::types::*;
use super::utils::*;
use std::collections::HashMap;
use std::time::Duration;

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_policy: BackoffPolicy::Exponential { factor: 2.0 },
            conditions: Vec::new(),
        }
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryState {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total_retries: 0,
        }
    }
}

impl RetryConfig {
    /// Retries connection failures and 5xx responses three times, and 429s
    /// five times with a longer backoff.
    pub fn standard() -> Self {
        Self::default()
            .with_category(
                RetryCategory::Network,
                CategoryConfig {
                    initial_delay: Duration::from_millis(500),
                    max_delay: Duration::from_secs(10),
                    conditions: vec![RetryCondition::Network(NetworkRetryCondition::Any)],
                    ..Default::default()
                },
            )
            .with_category(
                RetryCategory::ServerError,
                CategoryConfig {
                    initial_delay: Duration::from_millis(500),
                    max_delay: Duration::from_secs(10),
                    conditions: vec![RetryCondition::Request(
                        RequestRetryCondition::StatusRange(500, 599),
                    )],
                    ..Default::default()
                },
            )
            .with_category(
                RetryCategory::RateLimit,
                CategoryConfig {
                    max_retries: 5,
                    initial_delay: Duration::from_secs(1),
                    max_delay: Duration::from_secs(30),
                    conditions: vec![RetryCondition::Request(RequestRetryCondition::StatusCode(
                        429,
                    ))],
                    ..Default::default()
                },
            )
    }

    pub fn with_category(mut self, category: RetryCategory, config: CategoryConfig) -> Self {
        self.categories.insert(category, config);
        self
    }

    pub fn should_retry_request(
        &self,
        state: &mut RetryState,
        status: u16,
        content: &str,
    ) -> RetryDecision {
        self.decide(state, |condition| match condition {
            RetryCondition::Request(req_condition) => {
                retry_request_condition_should_apply(req_condition, status, content)
            }
            RetryCondition::Network(_) => false,
        })
    }

    pub fn should_retry_error(
        &self,
        state: &mut RetryState,
        error: &ScraperError,
    ) -> RetryDecision {
        self.decide(state, |condition| match condition {
            RetryCondition::Network(net_condition) => {
                retry_network_condition_should_apply(net_condition, error)
            }
            RetryCondition::Request(_) => false,
        })
    }

    fn decide(
        &self,
        state: &mut RetryState,
        matches: impl Fn(&RetryCondition) -> bool,
    ) -> RetryDecision {
        let mut exhausted = None;

        for (category, config) in &self.categories {
            if !config.conditions.iter().any(&matches) {
                continue;
            }

            let current_retries = state.counts.get(category).copied().unwrap_or(0);
            if current_retries >= config.max_retries {
                exhausted = Some((category.clone(), current_retries));
                continue;
            }

            state.counts.insert(category.clone(), current_retries + 1);
            state.total_retries += 1;
            return RetryDecision::Retry {
                category: category.clone(),
                delay: calculate_delay(config, current_retries),
            };
        }

        match exhausted {
            Some((category, attempts)) => RetryDecision::Exhausted { category, attempts },
            None => RetryDecision::NoMatch,
        }
    }
}

impl CategoryConfig {
    pub fn calculate_delay(&self, attempt: usize) -> Duration {
        calculate_delay(self, attempt)
    }
}
