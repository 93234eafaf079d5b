//! Postgres storage backend.
//!
//! Implements [`TransactionStore`] over a sqlx connection pool. Queries are
//! runtime-built (no compile-time macros) so the crate builds without a live
//! database; schema bootstrap runs at startup in place of a migration tool.

pub mod query;

use std::collections::BTreeMap;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{PgPool, Row};

use chainwatch_store::{StoreError, TransactionStore};
use chainwatch_types::{Page, StatusUpdate, TxFilter, TxId, TxRecord};

use query::Bind;

/// Connection settings for the `transactions` database.
///
/// Mirrors the `DB_*` environment surface; TLS is off, matching the
/// deployments this service targets.
#[derive(Clone, Debug)]
pub struct PgStoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// [`TransactionStore`] backed by a Postgres pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bootstrap the schema.
    pub async fn connect(config: &PgStoreConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .ssl_mode(PgSslMode::Disable);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .map_err(backend)?;

        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// Store over an existing pool; skips bootstrap.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `transactions` table and candidate index if absent.
    async fn bootstrap(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                chain TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}',
                monitoring BOOLEAN NOT NULL DEFAULT FALSE,
                pending BOOLEAN NOT NULL DEFAULT FALSE,
                checks BIGINT NOT NULL DEFAULT 0,
                success BOOLEAN NOT NULL DEFAULT FALSE,
                reviewed BOOLEAN NOT NULL DEFAULT FALSE,
                error TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS transactions_candidates_idx \
             ON transactions (monitoring, reviewed)",
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        tracing::info!("transactions schema ready");
        Ok(())
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn bind_all<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    binds: Vec<Bind>,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for bind in binds {
        q = match bind {
            Bind::Text(v) => q.bind(v),
            Bind::Bool(v) => q.bind(v),
            Bind::Int(v) => q.bind(v),
        };
    }
    q
}

fn record_from_row(row: &PgRow) -> Result<TxRecord, StoreError> {
    let metadata_json: String = row.try_get("metadata").map_err(backend)?;
    let metadata: BTreeMap<String, String> = serde_json::from_str(&metadata_json)
        .map_err(|e| StoreError::Serialization(format!("metadata: {e}")))?;

    Ok(TxRecord {
        id: TxId::new(row.try_get::<String, _>("id").map_err(backend)?),
        chain: chainwatch_types::ChainName::new(
            row.try_get::<String, _>("chain").map_err(backend)?,
        ),
        metadata,
        monitoring: row.try_get("monitoring").map_err(backend)?,
        pending: row.try_get("pending").map_err(backend)?,
        checks: row.try_get("checks").map_err(backend)?,
        success: row.try_get("success").map_err(backend)?,
        reviewed: row.try_get("reviewed").map_err(backend)?,
        error: row.try_get("error").map_err(backend)?,
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

#[async_trait::async_trait]
impl TransactionStore for PgStore {
    async fn create(&self, record: &TxRecord) -> Result<(), StoreError> {
        let metadata = serde_json::to_string(&record.metadata)
            .map_err(|e| StoreError::Serialization(format!("metadata: {e}")))?;

        sqlx::query(
            "INSERT INTO transactions \
             (id, chain, metadata, monitoring, pending, checks, success, reviewed, error) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(record.id.as_str())
        .bind(record.chain.as_str())
        .bind(metadata)
        .bind(record.monitoring)
        .bind(record.pending)
        .bind(record.checks)
        .bind(record.success)
        .bind(record.reviewed)
        .bind(&record.error)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(record.id.to_string())
            } else {
                backend(e)
            }
        })?;
        Ok(())
    }

    async fn get(&self, id: &TxId) -> Result<TxRecord, StoreError> {
        let row = sqlx::query(
            "SELECT id, chain, metadata, monitoring, pending, checks, success, reviewed, error \
             FROM transactions WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record_from_row(&row)
    }

    async fn find(&self, filter: &TxFilter, page: Page) -> Result<Vec<TxRecord>, StoreError> {
        let (sql, binds) = query::select_query(filter);
        let rows = bind_all(sqlx::query(&sql), binds)
            .bind(page.limit as i64)
            .bind(page.offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        rows.iter().map(record_from_row).collect()
    }

    async fn monitored(&self) -> Result<Vec<TxRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, chain, metadata, monitoring, pending, checks, success, reviewed, error \
             FROM transactions WHERE monitoring AND NOT reviewed \
             ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(record_from_row).collect()
    }

    async fn update_status(&self, id: &TxId, status: &StatusUpdate) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE transactions \
             SET monitoring = $1, pending = $2, success = $3, checks = $4, error = $5, \
                 updated_at = now() \
             WHERE id = $6",
        )
        .bind(status.monitoring)
        .bind(status.pending)
        .bind(status.success)
        .bind(status.checks)
        .bind(&status.error)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn mark_reviewed(&self, id: &TxId) -> Result<TxRecord, StoreError> {
        let result = sqlx::query(
            "UPDATE transactions SET reviewed = TRUE, updated_at = now() WHERE id = $1",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.get(id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}
