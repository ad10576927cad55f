// src/store/postgres.rs
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::QueryBuilder;
use tracing::info;

use super::{validate_batch, NewsDocument, NewsStore, COLLECTION};
use crate::config::Secret;
use crate::error::StoreError;

/// PostgreSQL-backed document collection. One row per document:
/// `_id` primary key, `"timestamp"` for recency ordering, the full document as JSONB.
///
/// The pool connects on first use, so an unreachable server surfaces as a failed
/// lookup or insert inside the run. Closed explicitly with [`PgNewsStore::close`].
#[derive(Clone)]
pub struct PgNewsStore {
    pool: PgPool,
}

impl PgNewsStore {
    /// Only a malformed URI fails here; no connection is opened yet.
    pub fn connect(
        uri: &Secret,
        db_name: &str,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let opts = PgConnectOptions::from_str(uri.expose())?.database(db_name);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(opts);
        info!(db = db_name, "database pool configured");
        Ok(Self { pool })
    }

    /// Create the collection table and its recency index if missing.
    pub async fn init(&self) -> Result<(), StoreError> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {COLLECTION} (
                _id TEXT PRIMARY KEY,
                "timestamp" TIMESTAMPTZ NOT NULL,
                doc JSONB NOT NULL,
                inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        );
        sqlx::query(&create_table).execute(&self.pool).await?;

        let create_index = format!(
            r#"
            CREATE INDEX IF NOT EXISTS {COLLECTION}_timestamp_idx
                ON {COLLECTION} ("timestamp" DESC)
            "#
        );
        sqlx::query(&create_index).execute(&self.pool).await?;
        info!(collection = COLLECTION, "collection ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("database connection closed");
    }
}

#[async_trait]
impl NewsStore for PgNewsStore {
    async fn recent_ids(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let sql = format!(r#"SELECT _id FROM {COLLECTION} ORDER BY "timestamp" DESC LIMIT $1"#);
        let ids: Vec<String> = sqlx::query_scalar(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn insert_many(&self, docs: Vec<NewsDocument>) -> Result<Vec<String>, StoreError> {
        validate_batch(&docs)?;
        let ids: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();

        // A single multi-row INSERT: a conflict on any _id aborts the whole batch.
        let mut qb: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!(r#"INSERT INTO {COLLECTION} (_id, "timestamp", doc) "#));
        qb.push_values(docs, |mut row, doc| {
            row.push_bind(doc.id.clone());
            row.push_bind(doc.timestamp.with_timezone(&Utc));
            row.push_bind(Json(doc));
        });

        let res = match qb.build().execute(&self.pool).await {
            Ok(res) => res,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(StoreError::Conflict(db.message().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if res.rows_affected() as usize != ids.len() {
            return Err(StoreError::Unavailable(format!(
                "inserted {} of {} documents",
                res.rows_affected(),
                ids.len()
            )));
        }
        Ok(ids)
    }
}
