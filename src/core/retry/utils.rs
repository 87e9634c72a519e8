use crate::ScraperError;

use super::types::*;
use regex::Regex;
use std::time::Duration;

pub fn retry_request_condition_should_apply(
    condition: &RequestRetryCondition,
    status: u16,
    content: &str,
) -> bool {
    match condition {
        RequestRetryCondition::StatusCode(code) => *code == status,
        RequestRetryCondition::StatusRange(low, high) => (*low..=*high).contains(&status),
        RequestRetryCondition::Content(content_condition) => {
            check_content_condition(content_condition, content)
        }
    }
}

pub fn retry_network_condition_should_apply(
    condition: &NetworkRetryCondition,
    error: &ScraperError,
) -> bool {
    let ScraperError::HttpError(error) = error else {
        return false;
    };

    match condition {
        NetworkRetryCondition::Any => true,
        NetworkRetryCondition::Timeout => error.is_timeout(),
        NetworkRetryCondition::Connect => error.is_connect(),
    }
}

fn check_content_condition(condition: &ContentRetryCondition, content: &str) -> bool {
    if condition.is_regex {
        Regex::new(&condition.pattern)
            .map(|re| re.is_match(content))
            .unwrap_or(false)
    } else {
        content
            .to_lowercase()
            .contains(&condition.pattern.to_lowercase())
    }
}

/// Backoff delay before retry number `attempt + 1`, never above `max_delay`.
/// Overflowing or non-finite results saturate to the cap.
pub fn calculate_delay(config: &CategoryConfig, attempt: usize) -> Duration {
    let initial = config.initial_delay.as_secs_f64();
    let secs = match config.backoff_policy {
        BackoffPolicy::Linear if attempt > 0 => initial * attempt as f64,
        BackoffPolicy::Exponential { factor } if attempt > 0 => {
            let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
            initial * f64::from(factor).powi(exponent)
        }
        _ => return std::cmp::min(config.initial_delay, config.max_delay),
    };

    Duration::try_from_secs_f64(secs)
        .map(|delay| std::cmp::min(delay, config.max_delay))
        .unwrap_or(config.max_delay)
}
