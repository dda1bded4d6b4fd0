// Shared test doubles: an in-memory store, a scripted probe and a counting
// notification channel.

#![allow(dead_code)]

use async_trait::async_trait;
use certwatch::checker::{CertificateProbe, CheckOutcome};
use certwatch::notify::NotificationChannel;
use certwatch::store::{CertStatus, CertificateStore, MonitoredRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory `CertificateStore` with the same upsert semantics as the SQL
/// implementation: identity is stable across updates and a `None` expiry never
/// clears a previously stored date.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<MonitoredRecord>>,
    next_id: Mutex<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<MonitoredRecord>) -> Self {
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            records: Mutex::new(records),
            next_id: Mutex::new(max_id),
        }
    }

    pub fn snapshot(&self) -> Vec<MonitoredRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn find_by_hostname(&self, hostname: &str) -> certwatch::Result<Option<MonitoredRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.hostname == hostname).cloned())
    }

    async fn upsert(
        &self,
        hostname: &str,
        expires: Option<DateTime<Utc>>,
        status: CertStatus,
    ) -> certwatch::Result<MonitoredRecord> {
        let mut records = self.records.lock().unwrap();

        if let Some(existing) = records.iter_mut().find(|r| r.hostname == hostname) {
            if expires.is_some() {
                existing.expires = expires;
            }
            existing.status = status;
            return Ok(existing.clone());
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let record = MonitoredRecord {
            id: *next_id,
            hostname: hostname.to_string(),
            expires,
            status,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn delete_by_hostname(&self, hostname: &str) -> certwatch::Result<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.hostname != hostname);
        Ok((before - records.len()) as u64)
    }

    async fn list_all(&self) -> certwatch::Result<Vec<MonitoredRecord>> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        Ok(records)
    }
}

/// Probe that answers from a fixed script and records which hostnames it saw
#[derive(Default)]
pub struct ScriptedProbe {
    outcomes: HashMap<String, CheckOutcome>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, hostname: &str, outcome: CheckOutcome) -> Self {
        self.outcomes.insert(hostname.to_string(), outcome);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CertificateProbe for ScriptedProbe {
    async fn check(&self, hostname: &str) -> CheckOutcome {
        self.calls.lock().unwrap().push(hostname.to_string());
        self.outcomes
            .get(hostname)
            .cloned()
            .unwrap_or(CheckOutcome::Failed {
                reason: "unscripted hostname".to_string(),
            })
    }
}

/// Channel that records every delivery and can be told to fail for specific
/// message substrings.
#[derive(Default)]
pub struct CountingChannel {
    sent: Mutex<Vec<(String, bool)>>,
    fail_containing: Option<String>,
}

impl CountingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(substring: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_containing: Some(substring.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<(String, bool)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for CountingChannel {
    async fn send(&self, text: &str, urgent: bool) -> certwatch::Result<()> {
        if let Some(needle) = &self.fail_containing {
            if text.contains(needle) {
                anyhow::bail!("delivery refused");
            }
        }
        self.sent.lock().unwrap().push((text.to_string(), urgent));
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "counting"
    }
}

pub fn record(id: i64, hostname: &str, expires: Option<DateTime<Utc>>) -> MonitoredRecord {
    MonitoredRecord {
        id,
        hostname: hostname.to_string(),
        expires,
        status: CertStatus::Valid,
    }
}
