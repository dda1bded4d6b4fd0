// Notification channels

pub mod log;
pub mod slack;

use async_trait::async_trait;

pub use log::LogChannel;
pub use slack::SlackChannel;

/// Outbound notification channel.
///
/// `urgent` selects a distinct visual marker on the receiving side; delivery
/// is fire-and-forget from the runner's point of view.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, text: &str, urgent: bool) -> crate::Result<()>;

    fn channel_name(&self) -> &str;
}
