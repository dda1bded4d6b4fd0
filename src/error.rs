// Error types for CertWatch
//
// Structured errors using thiserror. Probe errors are terminal outcomes of a
// single check and never propagate past the upsert coordinator; the remaining
// variants surface to the API layer or the caller.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Main error type for CertWatch operations
#[derive(Debug, Error)]
pub enum CertWatchError {
    /// The probe's hard deadline elapsed before either the handshake or an
    /// error path resolved
    #[error("certificate probe timed out after {duration:?}")]
    ProbeTimeout { duration: Duration },

    /// Handshake, DNS or TLS failure, or the server presented no usable
    /// certificate
    #[error("certificate probe failed: {details}")]
    ProbeFailure { details: String },

    /// The input could not be normalized into a host string
    #[error("could not parse {input:?} as a hostname")]
    MalformedHostname { input: String },

    /// Database operation errors
    #[error("database error: {0}")]
    Database(String),

    /// Invalid configuration or parameters
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Outbound notification delivery failed
    #[error("notification delivery failed: {0}")]
    Notification(String),

    /// Generic I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl CertWatchError {
    /// Shorthand for a probe failure with formatted details
    pub fn probe(details: impl Into<String>) -> Self {
        CertWatchError::ProbeFailure {
            details: details.into(),
        }
    }
}
