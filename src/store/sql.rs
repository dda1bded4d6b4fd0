// SQL-backed certificate store
//
// Supports PostgreSQL and SQLite through a shared pool enum. All access goes
// through parameterized queries; the upsert is a single INSERT .. ON CONFLICT
// so the insert-or-update decision happens inside the database.

use crate::error::CertWatchError;
use crate::store::{CertStatus, CertificateStore, MonitoredRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Connection pool for the configured backend
#[derive(Debug, Clone)]
pub enum DatabasePool {
    Postgres(sqlx::PgPool),
    Sqlite(sqlx::SqlitePool),
}

impl DatabasePool {
    /// Connect using a connection string. `postgres://` selects PostgreSQL,
    /// `sqlite:` selects SQLite (created on demand).
    pub async fn connect(url: &str) -> crate::Result<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await
                .map_err(|e| CertWatchError::Database(format!("failed to connect: {}", e)))?;
            Ok(DatabasePool::Postgres(pool))
        } else if url.starts_with("sqlite:") {
            let options = SqliteConnectOptions::from_str(url)
                .map_err(|e| CertWatchError::Database(format!("invalid sqlite url: {}", e)))?
                .create_if_missing(true);

            // An in-memory database exists per connection, so the pool must
            // not hand out more than one.
            let max_connections = if url.contains(":memory:") { 1 } else { 5 };

            let pool = SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await
                .map_err(|e| CertWatchError::Database(format!("failed to connect: {}", e)))?;
            Ok(DatabasePool::Sqlite(pool))
        } else {
            Err(CertWatchError::Config {
                message: format!("unsupported database url: {}", url),
            }
            .into())
        }
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        match self {
            DatabasePool::Postgres(pool) => pool.close().await,
            DatabasePool::Sqlite(pool) => pool.close().await,
        }
    }
}

/// `CertificateStore` backed by a `DatabasePool`
pub struct SqlStore {
    pool: DatabasePool,
}

impl SqlStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str) -> impl FnOnce(sqlx::Error) -> CertWatchError + '_ {
    move |e| CertWatchError::Database(format!("{}: {}", context, e))
}

#[async_trait]
impl CertificateStore for SqlStore {
    async fn find_by_hostname(&self, hostname: &str) -> crate::Result<Option<MonitoredRecord>> {
        let record = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, MonitoredRecord>(
                    "SELECT id, hostname, expires, status FROM certificate WHERE hostname = $1",
                )
                .bind(hostname)
                .fetch_optional(pool)
                .await
                .map_err(db_err("failed to fetch record"))?
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, MonitoredRecord>(
                    "SELECT id, hostname, expires, status FROM certificate WHERE hostname = ?",
                )
                .bind(hostname)
                .fetch_optional(pool)
                .await
                .map_err(db_err("failed to fetch record"))?
            }
        };

        Ok(record)
    }

    async fn upsert(
        &self,
        hostname: &str,
        expires: Option<DateTime<Utc>>,
        status: CertStatus,
    ) -> crate::Result<MonitoredRecord> {
        let record = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, MonitoredRecord>(
                    r#"
                    INSERT INTO certificate (hostname, expires, status)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (hostname) DO UPDATE
                        SET expires = COALESCE(EXCLUDED.expires, certificate.expires),
                            status = EXCLUDED.status
                    RETURNING id, hostname, expires, status
                    "#,
                )
                .bind(hostname)
                .bind(expires)
                .bind(status)
                .fetch_one(pool)
                .await
                .map_err(db_err("failed to upsert record"))?
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, MonitoredRecord>(
                    r#"
                    INSERT INTO certificate (hostname, expires, status)
                    VALUES (?, ?, ?)
                    ON CONFLICT (hostname) DO UPDATE
                        SET expires = COALESCE(excluded.expires, certificate.expires),
                            status = excluded.status
                    RETURNING id, hostname, expires, status
                    "#,
                )
                .bind(hostname)
                .bind(expires)
                .bind(status)
                .fetch_one(pool)
                .await
                .map_err(db_err("failed to upsert record"))?
            }
        };

        Ok(record)
    }

    async fn delete_by_hostname(&self, hostname: &str) -> crate::Result<u64> {
        let rows_affected = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query("DELETE FROM certificate WHERE hostname = $1")
                    .bind(hostname)
                    .execute(pool)
                    .await
                    .map_err(db_err("failed to delete record"))?
                    .rows_affected()
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query("DELETE FROM certificate WHERE hostname = ?")
                    .bind(hostname)
                    .execute(pool)
                    .await
                    .map_err(db_err("failed to delete record"))?
                    .rows_affected()
            }
        };

        Ok(rows_affected)
    }

    async fn list_all(&self) -> crate::Result<Vec<MonitoredRecord>> {
        let records = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, MonitoredRecord>(
                    "SELECT id, hostname, expires, status FROM certificate ORDER BY hostname",
                )
                .fetch_all(pool)
                .await
                .map_err(db_err("failed to list records"))?
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, MonitoredRecord>(
                    "SELECT id, hostname, expires, status FROM certificate ORDER BY hostname",
                )
                .fetch_all(pool)
                .await
                .map_err(db_err("failed to list records"))?
            }
        };

        Ok(records)
    }
}
