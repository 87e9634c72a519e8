use crate::http::CachedResponse;
use crate::ScraperResult;
use async_trait::async_trait;

/// URL-keyed store of previously fetched responses.
///
/// Keys are the exact URL string: no normalisation of scheme, trailing
/// slashes or query parameters. Entries never expire on their own.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, url: &str) -> ScraperResult<Option<CachedResponse>>;

    async fn set(&self, url: &str, response: CachedResponse) -> ScraperResult<()>;

    /// Returns whether an entry was removed.
    async fn invalidate(&self, url: &str) -> ScraperResult<bool>;

    async fn len(&self) -> ScraperResult<usize>;

    async fn is_empty(&self) -> ScraperResult<bool> {
        Ok(self.len().await? == 0)
    }
}
