use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ContentRetryCondition {
    pub pattern: String,
    pub is_regex: bool,
}

#[derive(Debug, Clone)]
pub enum RequestRetryCondition {
    StatusCode(u16),
    /// Inclusive on both ends.
    StatusRange(u16, u16),
    Content(ContentRetryCondition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkRetryCondition {
    Any,
    Timeout,
    Connect,
}

#[derive(Debug, Clone)]
pub enum RetryCondition {
    Request(RequestRetryCondition),
    Network(NetworkRetryCondition),
}

#[derive(Debug, Clone, Copy)]
pub enum BackoffPolicy {
    Constant,
    Linear,
    Exponential { factor: f32 },
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RetryCategory {
    RateLimit,      // 429
    ServerError,    // 500-599
    Network,        // connection failures, timeouts
    Custom(String), // Custom category
}

#[derive(Debug, Clone)]
pub struct CategoryConfig {
    pub max_retries: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_policy: BackoffPolicy,
    pub conditions: Vec<RetryCondition>,
}

/// Retry bookkeeping for a single logical fetch.
#[derive(Debug, Clone)]
pub struct RetryState {
    pub counts: HashMap<RetryCategory, usize>,
    pub total_retries: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    Retry {
        category: RetryCategory,
        delay: Duration,
    },
    /// A condition matched but its category has no retries left.
    Exhausted {
        category: RetryCategory,
        attempts: usize,
    },
    NoMatch,
}

#[derive(Debug, Clone, Default)]
pub struct RetryConfig {
    pub categories: HashMap<RetryCategory, CategoryConfig>,
}
