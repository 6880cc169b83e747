//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{OwnerId, ShortUrl};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::utils::db_error::is_unique_violation_on_alias;

#[derive(sqlx::FromRow)]
struct UrlRow {
    alias: String,
    original: String,
    owner: String,
    created_at: DateTime<Utc>,
    expired_at: DateTime<Utc>,
}

impl From<UrlRow> for ShortUrl {
    fn from(row: UrlRow) -> Self {
        ShortUrl {
            alias: row.alias,
            original: row.original,
            created_at: row.created_at,
            expired_at: row.expired_at,
            owner: OwnerId::from(row.owner),
        }
    }
}

/// PostgreSQL repository for short URLs.
///
/// The `urls.alias` primary key rejects duplicate aliases atomically, which
/// is what the service's collision retry relies on.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<ShortUrl>, StoreError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT alias, original, owner, created_at, expired_at
            FROM urls
            WHERE owner = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortUrl::from).collect())
    }

    async fn create(&self, url: ShortUrl) -> Result<String, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO urls (alias, original, owner, created_at, expired_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&url.alias)
        .bind(&url.original)
        .bind(url.owner.as_str())
        .bind(url.created_at)
        .bind(url.expired_at)
        .execute(self.pool.as_ref())
        .await;

        match result {
            Ok(_) => Ok(url.alias),
            Err(e) if is_unique_violation_on_alias(&e) => Err(StoreError::DuplicateAlias(url.alias)),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, alias: &str) -> Result<Option<ShortUrl>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT alias, original, owner, created_at, expired_at
            FROM urls
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn get_by_original_and_owner(
        &self,
        original: &str,
        owner: &OwnerId,
    ) -> Result<Option<ShortUrl>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT alias, original, owner, created_at, expired_at
            FROM urls
            WHERE original = $1 AND owner = $2
            ORDER BY expired_at DESC
            LIMIT 1
            "#,
        )
        .bind(original)
        .bind(owner.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn delete(&self, alias: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM urls WHERE alias = $1")
            .bind(alias)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn prolong(&self, alias: &str, duration: Duration) -> Result<bool, StoreError> {
        let seconds = duration.num_milliseconds() as f64 / 1000.0;

        let result = sqlx::query(
            r#"
            UPDATE urls
            SET expired_at = expired_at + make_interval(secs => $2::float8)
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .bind(seconds)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
