// Request and response bodies

use crate::store::CertStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AddCertificateRequest {
    /// Hostname or URL; schemes, paths, ports and a leading www. are stripped
    pub url: String,
    /// Known expiry. When absent, the hostname is probed.
    pub expires: Option<DateTime<Utc>>,
    /// Explicit status to store alongside a supplied expiry
    pub status: Option<CertStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveCertificateRequest {
    pub url: String,
}

/// Form body of a Slack slash command; `text` carries everything typed after
/// the command name
#[derive(Debug, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
