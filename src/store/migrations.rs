// Schema setup
//
// The DDL differs per backend (auto-increment syntax and timestamp types), so
// each variant carries its own statement instead of a shared migration file.

use crate::error::CertWatchError;
use crate::store::DatabasePool;

const POSTGRES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS certificate (
    id BIGSERIAL PRIMARY KEY,
    hostname VARCHAR(255) NOT NULL UNIQUE,
    expires TIMESTAMPTZ,
    status INTEGER NOT NULL DEFAULT 0
)
"#;

const SQLITE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS certificate (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hostname TEXT NOT NULL UNIQUE,
    expires TIMESTAMP,
    status INTEGER NOT NULL DEFAULT 0
)
"#;

/// Create the certificate table if it does not exist yet
pub async fn run_migrations(pool: &DatabasePool) -> crate::Result<()> {
    match pool {
        DatabasePool::Postgres(pg_pool) => {
            sqlx::query(POSTGRES_SCHEMA)
                .execute(pg_pool)
                .await
                .map_err(|e| {
                    CertWatchError::Database(format!("postgres migration failed: {}", e))
                })?;
        }
        DatabasePool::Sqlite(sqlite_pool) => {
            sqlx::query(SQLITE_SCHEMA)
                .execute(sqlite_pool)
                .await
                .map_err(|e| CertWatchError::Database(format!("sqlite migration failed: {}", e)))?;
        }
    }

    Ok(())
}
