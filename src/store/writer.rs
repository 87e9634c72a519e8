use super::models::{NewAuthor, NewQuote, SCRAPER_USER_ID};
use super::repository::QuoteRepository;
use crate::parser::AuthorRecord;
use crate::{ScraperError, ScraperResult};
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AuthorNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    Existing,
    Skipped(SkipReason),
}

/// Idempotent writes of scraped records, deduplicated by natural key.
pub struct PersistenceWriter {
    repo: Arc<dyn QuoteRepository>,
    created_by: i64,
}

impl PersistenceWriter {
    pub fn new(repo: Arc<dyn QuoteRepository>) -> Self {
        Self {
            repo,
            created_by: SCRAPER_USER_ID,
        }
    }

    pub fn with_created_by(mut self, user_id: i64) -> Self {
        self.created_by = user_id;
        self
    }

    /// An unknown author is a soft failure: logged and reported as
    /// `Skipped`. An unknown tag is an error for this quote only.
    pub async fn write_quote(
        &self,
        text: &str,
        author_name: &str,
        tag_words: &[String],
    ) -> ScraperResult<WriteOutcome> {
        if self.repo.find_quote_by_text(text).await?.is_some() {
            debug!("Quote already stored: {:?}", text);
            return Ok(WriteOutcome::Existing);
        }

        let Some(author) = self.repo.find_author_by_name(author_name).await? else {
            warn!("Author not found: {}", author_name);
            return Ok(WriteOutcome::Skipped(SkipReason::AuthorNotFound));
        };

        let mut tag_ids = Vec::with_capacity(tag_words.len());
        for word in tag_words {
            match self.repo.find_tag_by_word(word).await? {
                Some(tag) => tag_ids.push(tag.id),
                None => {
                    return Err(ScraperError::MissingTag {
                        quote: text.to_string(),
                        word: word.clone(),
                    })
                }
            }
        }

        let quote = NewQuote {
            quote: text.to_string(),
            author_id: author.id,
            tag_ids,
            created_by: self.created_by,
        };

        Ok(if self.repo.insert_quote_if_absent(&quote).await? {
            WriteOutcome::Inserted
        } else {
            WriteOutcome::Existing
        })
    }

    pub async fn write_author(&self, record: &AuthorRecord) -> ScraperResult<WriteOutcome> {
        if self.repo.find_author_by_name(&record.fullname).await?.is_some() {
            debug!("Author already stored: {}", record.fullname);
            return Ok(WriteOutcome::Existing);
        }

        let author = NewAuthor::from_record(record, self.created_by);
        Ok(if self.repo.insert_author_if_absent(&author).await? {
            debug!("Stored author {}", record.fullname);
            WriteOutcome::Inserted
        } else {
            WriteOutcome::Existing
        })
    }

    pub async fn write_tag(&self, word: &str) -> ScraperResult<WriteOutcome> {
        if self.repo.find_tag_by_word(word).await?.is_some() {
            return Ok(WriteOutcome::Existing);
        }

        Ok(
            if self.repo.insert_tag_if_absent(word, self.created_by).await? {
                debug!("Stored tag {}", word);
                WriteOutcome::Inserted
            } else {
                WriteOutcome::Existing
            },
        )
    }
}
