// Record upsert coordinator
//
// Single entry point for creating and refreshing monitored records. When the
// caller does not know the expiry, the coordinator probes the hostname first;
// a failed probe still persists the record with CheckFailed, never a lost
// write.

use crate::checker::{CertificateProbe, CheckOutcome};
use crate::error::CertWatchError;
use crate::hostname;
use crate::store::{CertStatus, CertificateStore, MonitoredRecord};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Outcome of re-probing one stored record during a refresh pass
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub hostname: String,
    pub outcome: CheckOutcome,
}

pub struct UpsertCoordinator {
    store: Arc<dyn CertificateStore>,
    probe: Arc<dyn CertificateProbe>,
}

impl UpsertCoordinator {
    pub fn new(store: Arc<dyn CertificateStore>, probe: Arc<dyn CertificateProbe>) -> Self {
        Self { store, probe }
    }

    /// Insert or update the record for a hostname.
    ///
    /// A caller-supplied expiry is stored as-is with the supplied status
    /// (absent status means `Unchecked`; an explicit `Unchecked` is honored,
    /// there is no truthiness coercion). Without an expiry the hostname is
    /// probed first and the outcome decides what gets persisted.
    pub async fn upsert(
        &self,
        raw_url: &str,
        expires: Option<DateTime<Utc>>,
        status: Option<CertStatus>,
    ) -> crate::Result<MonitoredRecord> {
        let hostname = hostname::normalize(raw_url)?;

        if let Some(expires) = expires {
            let status = status.unwrap_or(CertStatus::Unchecked);
            return self.store.upsert(&hostname, Some(expires), status).await;
        }

        let outcome = self.probe.check(&hostname).await;
        if outcome.is_timeout() {
            tracing::warn!(
                %hostname,
                error = %CertWatchError::ProbeTimeout { duration: crate::checker::PROBE_TIMEOUT },
                "certificate probe timed out"
            );
        }

        self.store
            .upsert(&hostname, outcome.expires(), outcome.status())
            .await
    }

    /// Remove the record for a hostname, returning how many rows went away
    pub async fn remove(&self, raw_url: &str) -> crate::Result<u64> {
        let hostname = hostname::normalize(raw_url)?;
        self.store.delete_by_hostname(&hostname).await
    }

    /// Re-probe every stored record and persist each outcome. Checks for
    /// independent hostnames run concurrently, bounded by the semaphore;
    /// a failure for one record never blocks the rest.
    pub async fn refresh_all(&self, max_concurrent: usize) -> crate::Result<Vec<RefreshResult>> {
        let records = self.store.list_all().await?;
        let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

        let mut tasks = Vec::with_capacity(records.len());

        for record in records {
            let store = Arc::clone(&self.store);
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&semaphore);

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.ok();

                let outcome = probe.check(&record.hostname).await;

                if let Err(e) = store
                    .upsert(&record.hostname, outcome.expires(), outcome.status())
                    .await
                {
                    tracing::error!(hostname = %record.hostname, "failed to persist check outcome: {}", e);
                }

                RefreshResult {
                    hostname: record.hostname,
                    outcome,
                }
            }));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("check task failed: {}", e),
            }
        }

        Ok(results)
    }
}
