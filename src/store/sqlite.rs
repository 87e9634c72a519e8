use super::models::{Author, NewAuthor, NewQuote, Quote, StoreCounts, Tag};
use super::repository::QuoteRepository;
use crate::ScraperResult;
use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    fullname      TEXT NOT NULL UNIQUE,
    born_date     TEXT NOT NULL,
    born_location TEXT NOT NULL,
    description   TEXT NOT NULL,
    created_by    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    word       TEXT NOT NULL UNIQUE,
    created_by INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS quotes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    quote      TEXT NOT NULL UNIQUE,
    author_id  INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    created_by INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes(author_id);

CREATE TABLE IF NOT EXISTS quote_tags (
    quote_id INTEGER NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
    tag_id   INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (quote_id, tag_id)
);
"#;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url`, e.g.
    /// `sqlite://quotes.db`, and makes sure the schema exists.
    pub async fn connect(url: &str) -> ScraperResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to {}", url);
        Self::with_pool(pool).await
    }

    /// A private database living as long as the store. Backed by a single
    /// connection that is never recycled, since each in-memory connection is
    /// its own database.
    pub async fn in_memory() -> ScraperResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> ScraperResult<Self> {
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl QuoteRepository for SqliteStore {
    async fn find_author_by_name(&self, fullname: &str) -> ScraperResult<Option<Author>> {
        Ok(sqlx::query_as::<_, Author>(
            "SELECT id, fullname, born_date, born_location, description, created_by
             FROM authors WHERE fullname = ?1",
        )
        .bind(fullname)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_tag_by_word(&self, word: &str) -> ScraperResult<Option<Tag>> {
        Ok(
            sqlx::query_as::<_, Tag>("SELECT id, word, created_by FROM tags WHERE word = ?1")
                .bind(word)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_quote_by_text(&self, text: &str) -> ScraperResult<Option<Quote>> {
        Ok(sqlx::query_as::<_, Quote>(
            "SELECT id, quote, author_id, created_by FROM quotes WHERE quote = ?1",
        )
        .bind(text)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_author_if_absent(&self, author: &NewAuthor) -> ScraperResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO authors (fullname, born_date, born_location, description, created_by)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(fullname) DO NOTHING
            "#,
        )
        .bind(&author.fullname)
        .bind(&author.born_date)
        .bind(&author.born_location)
        .bind(&author.description)
        .bind(author.created_by)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_tag_if_absent(&self, word: &str, created_by: i64) -> ScraperResult<bool> {
        let result = sqlx::query(
            "INSERT INTO tags (word, created_by) VALUES (?1, ?2) ON CONFLICT(word) DO NOTHING",
        )
        .bind(word)
        .bind(created_by)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_quote_if_absent(&self, quote: &NewQuote) -> ScraperResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO quotes (quote, author_id, created_by)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(quote) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&quote.quote)
        .bind(quote.author_id)
        .bind(quote.created_by)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(quote_id) = inserted else {
            tx.rollback().await?;
            return Ok(false);
        };

        for tag_id in &quote.tag_ids {
            sqlx::query(
                "INSERT INTO quote_tags (quote_id, tag_id) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
            )
            .bind(quote_id)
            .bind(*tag_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Inserted quote {} with {} tags", quote_id, quote.tag_ids.len());
        Ok(true)
    }

    async fn tags_for_quote(&self, quote_id: i64) -> ScraperResult<Vec<Tag>> {
        Ok(sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.word, t.created_by
            FROM tags t
            JOIN quote_tags qt ON qt.tag_id = t.id
            WHERE qt.quote_id = ?1
            ORDER BY t.word
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn counts(&self) -> ScraperResult<StoreCounts> {
        let (authors, tags, quotes): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM authors),
                (SELECT COUNT(*) FROM tags),
                (SELECT COUNT(*) FROM quotes)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreCounts {
            authors: authors as usize,
            tags: tags as usize,
            quotes: quotes as usize,
        })
    }
}
