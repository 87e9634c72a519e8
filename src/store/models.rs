use crate::parser::AuthorRecord;
use serde::{Deserialize, Serialize};

/// Identity recorded as `created_by` on rows the scraper inserts.
pub const SCRAPER_USER_ID: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub fullname: String,
    pub born_date: String,
    pub born_location: String,
    pub description: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub word: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    pub id: i64,
    pub quote: String,
    pub author_id: i64,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub fullname: String,
    pub born_date: String,
    pub born_location: String,
    pub description: String,
    pub created_by: i64,
}

impl NewAuthor {
    pub fn from_record(record: &AuthorRecord, created_by: i64) -> Self {
        Self {
            fullname: record.fullname.clone(),
            born_date: record.born_date.clone(),
            born_location: record.born_location.clone(),
            description: record.description.clone(),
            created_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub quote: String,
    pub author_id: i64,
    pub tag_ids: Vec<i64>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub authors: usize,
    pub tags: usize,
    pub quotes: usize,
}

/// Rows that remember who created them. The curation UI only lets the
/// creating identity edit or delete a row; scraped rows belong to the
/// configured scraper identity ([`SCRAPER_USER_ID`] unless overridden).
pub trait Attributed {
    fn created_by(&self) -> i64;

    fn is_editable_by(&self, user_id: i64) -> bool {
        self.created_by() == user_id
    }

    fn is_scraped(&self, scraper_user_id: i64) -> bool {
        self.created_by() == scraper_user_id
    }
}

impl Attributed for Author {
    fn created_by(&self) -> i64 {
        self.created_by
    }
}

impl Attributed for Tag {
    fn created_by(&self) -> i64 {
        self.created_by
    }
}

impl Attributed for Quote {
    fn created_by(&self) -> i64 {
        self.created_by
    }
}
