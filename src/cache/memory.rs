use super::base::ResponseCache;
use crate::http::CachedResponse;
use crate::ScraperResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-lifetime cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, url: &str) -> ScraperResult<Option<CachedResponse>> {
        Ok(self.entries.read().get(url).cloned())
    }

    async fn set(&self, url: &str, response: CachedResponse) -> ScraperResult<()> {
        self.entries.write().insert(url.to_string(), response);
        Ok(())
    }

    async fn invalidate(&self, url: &str) -> ScraperResult<bool> {
        Ok(self.entries.write().remove(url).is_some())
    }

    async fn len(&self) -> ScraperResult<usize> {
        Ok(self.entries.read().len())
    }
}
