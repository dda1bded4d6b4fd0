// Application configuration
//
// Loaded from a TOML file with sensible defaults for every section, so a
// missing file or a partial one still yields a runnable configuration.

use crate::error::CertWatchError;
use crate::reminder::ReminderTiers;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub checker: CheckerConfig,
    pub slack: Option<SlackConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally reachable base URL, used to build links in slash-command
    /// output
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

/// Reminder day-offsets per tier plus the hour of day at which the daily
/// check-and-remind pass runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_friendly")]
    pub friendly: Vec<u32>,
    #[serde(default = "default_unfriendly")]
    pub unfriendly: Vec<u32>,
    #[serde(default = "default_check_hour")]
    pub check_hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: usize,
    #[serde(default = "default_checker_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    pub enabled: bool,
    pub webhook_url: String,
    #[serde(default = "default_bot_name")]
    pub username: String,
    #[serde(default = "default_icon_happy")]
    pub icon_happy: String,
    #[serde(default = "default_icon_angry")]
    pub icon_angry: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://certwatch.db".to_string()
}

fn default_friendly() -> Vec<u32> {
    vec![30, 14]
}

fn default_unfriendly() -> Vec<u32> {
    vec![7, 2, 1, 0]
}

fn default_check_hour() -> u32 {
    12
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_max_concurrent_checks() -> usize {
    10
}

fn default_checker_port() -> u16 {
    443
}

fn default_bot_name() -> String {
    "Sally".to_string()
}

fn default_icon_happy() -> String {
    ":dromedary_camel:".to_string()
}

fn default_icon_angry() -> String {
    ":rage:".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            friendly: default_friendly(),
            unfriendly: default_unfriendly(),
            check_hour: default_check_hour(),
        }
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_concurrent_checks: default_max_concurrent_checks(),
            port: default_checker_port(),
        }
    }
}

impl RemindersConfig {
    pub fn tiers(&self) -> ReminderTiers {
        ReminderTiers {
            friendly: self.friendly.clone(),
            unfriendly: self.unfriendly.clone(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| CertWatchError::Config {
            message: format!("failed to read config file {:?}: {}", path.as_ref(), e),
        })?;

        let config: AppConfig = toml::from_str(&contents).map_err(|e| CertWatchError::Config {
            message: format!("failed to parse TOML config: {}", e),
        })?;

        Ok(config)
    }

    /// Reject impossible values and warn about ambiguous ones
    pub fn validate(&self) -> crate::Result<()> {
        if self.reminders.check_hour > 23 {
            return Err(CertWatchError::Config {
                message: format!(
                    "check_hour must be 0-23, got {}",
                    self.reminders.check_hour
                ),
            }
            .into());
        }

        if self.checker.timeout_seconds == 0 {
            return Err(CertWatchError::Config {
                message: "checker timeout_seconds must be at least 1".to_string(),
            }
            .into());
        }

        let overlap = self.reminders.tiers().overlapping_offsets();
        if !overlap.is_empty() {
            tracing::warn!(
                ?overlap,
                "reminder offsets appear in both tiers; the friendly tier wins on those days"
            );
        }

        Ok(())
    }
}
