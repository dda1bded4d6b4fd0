// Scheduled reminder runner
//
// Ticks once per hour; when the local hour matches the configured check hour
// it refreshes every record and then evaluates the reminder policy against
// each one, forwarding due reminders to the notification channel. Failures
// are isolated per record.

use crate::notify::NotificationChannel;
use crate::reminder::policy::{evaluate, ReminderDecision, ReminderTier, ReminderTiers};
use crate::store::{CertificateStore, MonitoredRecord};
use crate::upsert::UpsertCoordinator;
use chrono::{DateTime, Local, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

pub struct ReminderRunner {
    store: Arc<dyn CertificateStore>,
    channel: Arc<dyn NotificationChannel>,
    coordinator: Arc<UpsertCoordinator>,
    tiers: ReminderTiers,
    check_hour: u32,
    max_concurrent_checks: usize,
}

impl ReminderRunner {
    pub fn new(
        store: Arc<dyn CertificateStore>,
        channel: Arc<dyn NotificationChannel>,
        coordinator: Arc<UpsertCoordinator>,
        tiers: ReminderTiers,
        check_hour: u32,
        max_concurrent_checks: usize,
    ) -> Self {
        Self {
            store,
            channel,
            coordinator,
            tiers,
            check_hour,
            max_concurrent_checks,
        }
    }

    /// Hourly loop. The hour comparison passes once per 24-hour period, so a
    /// reminder decision is computed at most once per calendar day.
    pub async fn run(&self) -> crate::Result<()> {
        tracing::info!(
            check_hour = self.check_hour,
            channel = self.channel.channel_name(),
            "reminder runner started"
        );

        let mut tick = hourly_interval();

        loop {
            tick.tick().await;

            if Local::now().hour() != self.check_hour {
                continue;
            }

            if let Err(e) = self.coordinator.refresh_all(self.max_concurrent_checks).await {
                tracing::error!("certificate refresh pass failed: {}", e);
            }

            match self.run_once(Utc::now()).await {
                Ok(sent) => tracing::info!(sent, "reminder pass complete"),
                Err(e) => tracing::error!("reminder pass failed: {}", e),
            }
        }
    }

    /// Evaluate every record against the given reference date and forward due
    /// reminders. Returns the number of reminders delivered.
    pub async fn run_once(&self, reference: DateTime<Utc>) -> crate::Result<usize> {
        let records = self.store.list_all().await?;
        let mut sent = 0;

        for record in records {
            let Some(expires) = record.expires else {
                continue;
            };

            let Some(decision) = evaluate(expires, reference, &self.tiers) else {
                continue;
            };

            let message = format_reminder(&record, &decision);
            let urgent = decision.tier == ReminderTier::Unfriendly;

            match self.channel.send(&message, urgent).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    tracing::error!(
                        hostname = %record.hostname,
                        "failed to deliver reminder: {}",
                        e
                    );
                }
            }
        }

        Ok(sent)
    }
}

/// Hourly tick. Missed ticks are skipped, not replayed: after a suspension,
/// two ticks landing in the same wall-clock hour would pass the hour check
/// twice and double-send that day's reminders.
fn hourly_interval() -> Interval {
    let mut tick = interval(Duration::from_secs(3600));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tick
}

/// Reminder message for one record and decision
fn format_reminder(record: &MonitoredRecord, decision: &ReminderDecision) -> String {
    let expires = record
        .expires
        .map(|e| e.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let plural = if decision.days_left == 1 { "" } else { "s" };
    let expiring = format!(
        "The SSL certificate for *{}* is expiring in *{} day{}* at {}.",
        record.hostname, decision.days_left, plural, expires
    );

    match decision.tier {
        ReminderTier::Friendly => format!(
            "{}\nThis is a friendly reminder. You still have enough time :smile:",
            expiring
        ),
        ReminderTier::Unfriendly => format!(
            "{}\nThis is a \"not-so-friendly\" reminder. You really should renew this certificate! :rage:",
            expiring
        ),
    }
}
