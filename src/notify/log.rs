// Fallback channel used when no Slack webhook is configured

use crate::notify::NotificationChannel;
use async_trait::async_trait;

/// Writes reminders to the log instead of an external service
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn send(&self, text: &str, urgent: bool) -> crate::Result<()> {
        if urgent {
            tracing::warn!("reminder: {}", text);
        } else {
            tracing::info!("reminder: {}", text);
        }
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}
