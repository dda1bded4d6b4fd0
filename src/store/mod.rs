// Certificate store - records, status codes and the storage interface

pub mod migrations;
pub mod sql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub use migrations::run_migrations;
pub use sql::{DatabasePool, SqlStore};

/// Check status of a monitored hostname, stored as an INTEGER column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum CertStatus {
    /// No probe has resolved yet
    Unchecked = 0,
    /// Last probe produced a valid certificate with an expiry date
    Valid = 1,
    /// Last probe did not resolve (error or timeout)
    CheckFailed = 2,
}

impl std::fmt::Display for CertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CertStatus::Unchecked => write!(f, "unchecked"),
            CertStatus::Valid => write!(f, "valid"),
            CertStatus::CheckFailed => write!(f, "check_failed"),
        }
    }
}

/// One tracked hostname with its last known certificate state
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonitoredRecord {
    /// Storage-assigned identity, immutable once assigned
    pub id: i64,
    /// Normalized hostname, unique across all records
    pub hostname: String,
    /// Certificate not-after timestamp; absent until a check resolves
    pub expires: Option<DateTime<Utc>>,
    pub status: CertStatus,
}

/// Storage interface for monitored records.
///
/// Implementations own the transactional guarantees; the hostname column
/// carries a UNIQUE constraint so `upsert` is a single conditional write and
/// two concurrent upserts for the same hostname cannot produce two rows.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Look up a record by normalized hostname
    async fn find_by_hostname(&self, hostname: &str) -> crate::Result<Option<MonitoredRecord>>;

    /// Insert a record for the hostname, or update the existing one in place
    /// (identity preserved). A `None` expiry never clears a previously known
    /// date - a failed probe leaves the stale expiry visible.
    async fn upsert(
        &self,
        hostname: &str,
        expires: Option<DateTime<Utc>>,
        status: CertStatus,
    ) -> crate::Result<MonitoredRecord>;

    /// Delete by normalized hostname, returning the number of rows removed
    async fn delete_by_hostname(&self, hostname: &str) -> crate::Result<u64>;

    /// All monitored records, ordered by hostname
    async fn list_all(&self) -> crate::Result<Vec<MonitoredRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(CertStatus::Unchecked.to_string(), "unchecked");
        assert_eq!(CertStatus::Valid.to_string(), "valid");
        assert_eq!(CertStatus::CheckFailed.to_string(), "check_failed");
    }

    #[test]
    fn test_record_serialization() {
        let record = MonitoredRecord {
            id: 1,
            hostname: "example.com".to_string(),
            expires: None,
            status: CertStatus::Unchecked,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("example.com"));
        assert!(json.contains("unchecked"));

        let back: MonitoredRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hostname, "example.com");
        assert_eq!(back.status, CertStatus::Unchecked);
    }
}
