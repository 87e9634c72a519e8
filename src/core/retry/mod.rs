mod r#impl;
mod types;
mod utils;

pub use types::{
    BackoffPolicy, CategoryConfig, ContentRetryCondition, NetworkRetryCondition,
    RequestRetryCondition, RetryCategory, RetryCondition, RetryConfig, RetryDecision, RetryState,
};
pub use utils::calculate_delay;
