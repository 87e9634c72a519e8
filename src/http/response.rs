use crate::core::retry::RetryCategory;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: Url,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub retry_count: usize,
    pub retry_history: HashMap<RetryCategory, usize>,
    pub from_cache: bool,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// What the response cache keeps for a URL: status, headers and raw body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn into_response(self, url: Url) -> HttpResponse {
        HttpResponse {
            url,
            status: self.status,
            headers: self.headers,
            body: self.body,
            timestamp: self.fetched_at,
            retry_count: 0,
            retry_history: HashMap::new(),
            from_cache: true,
        }
    }
}

impl From<&HttpResponse> for CachedResponse {
    fn from(response: &HttpResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: response.body.clone(),
            fetched_at: response.timestamp,
        }
    }
}
