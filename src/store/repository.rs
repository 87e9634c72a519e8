use super::models::{Author, NewAuthor, NewQuote, Quote, StoreCounts, Tag};
use crate::ScraperResult;
use async_trait::async_trait;

/// Natural-key lookups and atomic insert-if-absent operations over the
/// quote/author/tag schema.
///
/// Every `insert_*_if_absent` must be atomic with respect to concurrent
/// callers: two racing inserts of the same natural key leave exactly one row,
/// and exactly one of them reports `true`.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn find_author_by_name(&self, fullname: &str) -> ScraperResult<Option<Author>>;

    async fn find_tag_by_word(&self, word: &str) -> ScraperResult<Option<Tag>>;

    async fn find_quote_by_text(&self, text: &str) -> ScraperResult<Option<Quote>>;

    async fn insert_author_if_absent(&self, author: &NewAuthor) -> ScraperResult<bool>;

    async fn insert_tag_if_absent(&self, word: &str, created_by: i64) -> ScraperResult<bool>;

    /// Inserts the quote and its tag links together, or nothing at all.
    async fn insert_quote_if_absent(&self, quote: &NewQuote) -> ScraperResult<bool>;

    async fn tags_for_quote(&self, quote_id: i64) -> ScraperResult<Vec<Tag>>;

    async fn counts(&self) -> ScraperResult<StoreCounts>;
}
