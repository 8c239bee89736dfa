//! SQLite implementation of the persistent QA cache

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::domain::cache::{key_for, normalize};
use crate::domain::{AnswerPayload, CachedAnswer, DomainError, QaCache, QaCacheStats, SourceRef};

/// Exact-match answer cache in SQLite. Keys are content hashes of the
/// normalized query, so only trivially equivalent queries hit.
#[derive(Debug)]
pub struct SqliteQaCache {
    pool: SqlitePool,
}

impl SqliteQaCache {
    /// Connect and create the schema if needed.
    ///
    /// A single connection is enough for a chat bot's write rate, and it
    /// keeps `sqlite::memory:` URLs coherent (each pooled connection would
    /// otherwise get its own empty database).
    pub async fn connect(database_url: &str) -> Result<Self, DomainError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| DomainError::storage(format!("connect to {database_url}: {e}")))?;

        let cache = Self { pool };
        cache.ensure_schema().await?;
        info!(database_url, "QA cache ready");
        Ok(cache)
    }

    async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS qa_cache (
                query_hash TEXT PRIMARY KEY,
                query_text TEXT NOT NULL,
                answer TEXT NOT NULL,
                sources TEXT NOT NULL DEFAULT '[]',
                context_used INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                access_count INTEGER NOT NULL DEFAULT 0,
                last_accessed TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS query_stats (
                query_normalized TEXT PRIMARY KEY,
                count INTEGER NOT NULL DEFAULT 1,
                last_seen TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

fn storage_err(e: sqlx::Error) -> DomainError {
    DomainError::storage(e.to_string())
}

#[async_trait]
impl QaCache for SqliteQaCache {
    async fn get(&self, query: &str) -> Result<Option<CachedAnswer>, DomainError> {
        let key = key_for(query);

        let row = sqlx::query(
            "SELECT answer, sources, context_used, access_count FROM qa_cache WHERE query_hash = ?",
        )
        .bind(&key)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE qa_cache SET access_count = access_count + 1, last_accessed = CURRENT_TIMESTAMP \
             WHERE query_hash = ?",
        )
        .bind(&key)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        let sources_json: String = row.get("sources");
        let sources: Vec<SourceRef> = serde_json::from_str(&sources_json)
            .map_err(|e| DomainError::storage(format!("corrupt sources column: {e}")))?;
        let context_used: i64 = row.get("context_used");
        let access_count: i64 = row.get("access_count");

        debug!(key = %key, "QA cache hit");

        Ok(Some(CachedAnswer {
            payload: AnswerPayload {
                answer: row.get("answer"),
                sources,
                context_used: context_used.max(0) as usize,
            },
            access_count: access_count + 1,
        }))
    }

    async fn put(&self, query: &str, payload: &AnswerPayload) -> Result<(), DomainError> {
        let sources_json = serde_json::to_string(&payload.sources)
            .map_err(|e| DomainError::storage(format!("serialize sources: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO qa_cache (query_hash, query_text, answer, sources, context_used, access_count)
            VALUES (?, ?, ?, ?, ?, 0)
            ON CONFLICT(query_hash) DO UPDATE SET
                query_text = excluded.query_text,
                answer = excluded.answer,
                sources = excluded.sources,
                context_used = excluded.context_used
            "#,
        )
        .bind(key_for(query))
        .bind(query.trim())
        .bind(&payload.answer)
        .bind(sources_json)
        .bind(payload.context_used as i64)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn log_query(&self, query: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO query_stats (query_normalized, count) VALUES (?, 1)
            ON CONFLICT(query_normalized) DO UPDATE SET
                count = count + 1,
                last_seen = CURRENT_TIMESTAMP
            "#,
        )
        .bind(normalize(query))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn stats(&self) -> Result<QaCacheStats, DomainError> {
        let row =
            sqlx::query("SELECT COUNT(*) AS cached, COALESCE(SUM(access_count), 0) AS hits FROM qa_cache")
                .fetch_one(&self.pool)
                .await
                .map_err(storage_err)?;

        Ok(QaCacheStats {
            cached_answers: row.get("cached"),
            total_hits: row.get("hits"),
        })
    }

    async fn clear(&self) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM qa_cache")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        sqlx::query("DELETE FROM query_stats")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        info!("QA cache cleared");
        Ok(())
    }
}
