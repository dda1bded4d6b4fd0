// CertWatch - TLS certificate expiry tracker and reminder bot
// Licensed under GPL-3.0

//! CertWatch keeps an inventory of TLS-protected hostnames, probes each one
//! for its certificate expiry date and emits Slack reminders on a configurable
//! day-offset schedule as the expiry approaches.

pub mod api;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod hostname;
pub mod notify;
pub mod reminder;
pub mod store;
pub mod upsert;

// Re-export commonly used types
pub use crate::checker::{CertificateProbe, CheckOutcome, TlsProbe};
pub use crate::cli::Args;
pub use crate::error::CertWatchError;
pub use crate::store::{CertStatus, CertificateStore, MonitoredRecord};

/// Result type for CertWatch operations
pub type Result<T> = anyhow::Result<T>;
