use super::base::ResponseCache;
use crate::http::CachedResponse;
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS response_cache (
    url        TEXT PRIMARY KEY NOT NULL,
    status     INTEGER NOT NULL,
    headers    TEXT NOT NULL,
    body       TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);
"#;

/// Cache persisted in the `response_cache` table, surviving restarts.
#[derive(Clone)]
pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    pub async fn open(pool: SqlitePool) -> ScraperResult<Self> {
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ResponseCache for SqliteCache {
    async fn get(&self, url: &str) -> ScraperResult<Option<CachedResponse>> {
        let row: Option<(i64, String, String, String)> = sqlx::query_as(
            "SELECT status, headers, body, fetched_at FROM response_cache WHERE url = ?1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        let Some((status, headers, body, fetched_at)) = row else {
            return Ok(None);
        };

        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map_err(|e| ScraperError::DecodingError {
                url: url.to_string(),
                reason: format!("bad cached timestamp: {e}"),
            })?
            .with_timezone(&Utc);

        Ok(Some(CachedResponse {
            status: u16::try_from(status).map_err(|e| ScraperError::DecodingError {
                url: url.to_string(),
                reason: format!("bad cached status {status}: {e}"),
            })?,
            headers: serde_json::from_str(&headers)?,
            body,
            fetched_at,
        }))
    }

    async fn set(&self, url: &str, response: CachedResponse) -> ScraperResult<()> {
        debug!("Caching {} ({} bytes)", url, response.body.len());
        sqlx::query(
            r#"
            INSERT INTO response_cache (url, status, headers, body, fetched_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(url) DO UPDATE SET
                status = excluded.status,
                headers = excluded.headers,
                body = excluded.body,
                fetched_at = excluded.fetched_at
            "#,
        )
        .bind(url)
        .bind(i64::from(response.status))
        .bind(serde_json::to_string(&response.headers)?)
        .bind(response.body)
        .bind(response.fetched_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn invalidate(&self, url: &str) -> ScraperResult<bool> {
        let result = sqlx::query("DELETE FROM response_cache WHERE url = ?1")
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn len(&self) -> ScraperResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM response_cache")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}
