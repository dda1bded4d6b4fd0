// Slack notification channel - incoming-webhook integration

use crate::config::SlackConfig;
use crate::error::CertWatchError;
use crate::notify::NotificationChannel;
use async_trait::async_trait;
use serde_json::json;

/// Posts reminders to a Slack incoming webhook. Urgent messages switch the
/// bot icon from the happy emoji to the angry one.
pub struct SlackChannel {
    config: SlackConfig,
    client: reqwest::Client,
}

impl SlackChannel {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn format_payload(&self, text: &str, urgent: bool) -> serde_json::Value {
        let icon = if urgent {
            &self.config.icon_angry
        } else {
            &self.config.icon_happy
        };

        json!({
            "username": self.config.username,
            "icon_emoji": icon,
            "text": text,
        })
    }
}

#[async_trait]
impl NotificationChannel for SlackChannel {
    async fn send(&self, text: &str, urgent: bool) -> crate::Result<()> {
        let payload = self.format_payload(text, urgent);

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CertWatchError::Notification(format!("webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CertWatchError::Notification(format!(
                "slack webhook returned status {}: {}",
                status, body
            ))
            .into());
        }

        tracing::info!(urgent, "sent slack reminder: {}", text);
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> SlackConfig {
        SlackConfig {
            enabled: true,
            webhook_url: "https://hooks.slack.com/services/TEST/WEBHOOK/URL".to_string(),
            username: "Sally".to_string(),
            icon_happy: ":dromedary_camel:".to_string(),
            icon_angry: ":rage:".to_string(),
        }
    }

    #[test]
    fn test_channel_name() {
        let channel = SlackChannel::new(create_test_config());
        assert_eq!(channel.channel_name(), "slack");
    }

    #[test]
    fn test_payload_icon_tracks_urgency() {
        let channel = SlackChannel::new(create_test_config());

        let calm = channel.format_payload("all fine", false);
        assert_eq!(calm["icon_emoji"], ":dromedary_camel:");
        assert_eq!(calm["username"], "Sally");
        assert_eq!(calm["text"], "all fine");

        let angry = channel.format_payload("renew now", true);
        assert_eq!(angry["icon_emoji"], ":rage:");
    }
}
