// TLS probe - reads the leaf certificate's not-after date from a handshake
//
// One probe per call, raced against a hard deadline. Whichever side finishes
// first wins; the loser is dropped, so a late handshake result can never
// overwrite a timeout outcome.

use crate::error::CertWatchError;
use crate::store::CertStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::ServerName;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

/// Hard deadline for a single probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Terminal outcome of one probe.
///
/// A timeout persists as the same `CheckFailed` status as a failed handshake,
/// but callers can still tell the two apart here.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// Handshake succeeded and the leaf certificate parsed
    Valid { expires: DateTime<Utc> },
    /// DNS, connection or TLS failure, or no usable certificate
    Failed { reason: String },
    /// Neither the handshake nor an error resolved before the deadline
    TimedOut,
}

impl CheckOutcome {
    /// Status to persist for this outcome
    pub fn status(&self) -> CertStatus {
        match self {
            CheckOutcome::Valid { .. } => CertStatus::Valid,
            CheckOutcome::Failed { .. } | CheckOutcome::TimedOut => CertStatus::CheckFailed,
        }
    }

    /// Expiry carried by this outcome, if any
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        match self {
            CheckOutcome::Valid { expires } => Some(*expires),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CheckOutcome::TimedOut)
    }
}

/// Interface for the certificate checker, so the upsert coordinator and the
/// reminder runner can be exercised with scripted probes in tests
#[async_trait]
pub trait CertificateProbe: Send + Sync {
    /// Probe the hostname once. Always produces exactly one outcome; failures
    /// are encoded in the outcome rather than an error.
    async fn check(&self, hostname: &str) -> CheckOutcome;
}

/// Live TLS probe against port 443
pub struct TlsProbe {
    port: u16,
    probe_timeout: Duration,
    connector: TlsConnector,
}

impl TlsProbe {
    pub fn new(port: u16, probe_timeout: Duration) -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            port,
            probe_timeout,
            connector: TlsConnector::from(Arc::new(config)),
        }
    }

    /// One handshake attempt: resolve, connect, shake hands, parse the leaf.
    async fn handshake(&self, hostname: &str) -> Result<DateTime<Utc>, CertWatchError> {
        let ip = resolve_hostname(hostname).await?;
        let addr = SocketAddr::new(ip, self.port);

        let stream = TcpStream::connect(addr).await?;

        let server_name = ServerName::try_from(hostname)
            .map_err(|_| CertWatchError::probe(format!("invalid DNS name: {}", hostname)))?
            .to_owned();

        let tls_stream = self
            .connector
            .connect(server_name, stream)
            .await
            .map_err(|e| CertWatchError::probe(format!("TLS handshake failed: {}", e)))?;

        let (_io, connection) = tls_stream.into_inner();
        let certs = connection
            .peer_certificates()
            .ok_or_else(|| CertWatchError::probe("no certificates received from server"))?;
        let leaf = certs
            .first()
            .ok_or_else(|| CertWatchError::probe("empty certificate chain"))?;

        parse_not_after(leaf.as_ref())
    }
}

#[async_trait]
impl CertificateProbe for TlsProbe {
    async fn check(&self, hostname: &str) -> CheckOutcome {
        run_with_deadline(self.handshake(hostname), self.probe_timeout).await
    }
}

impl Default for TlsProbe {
    fn default() -> Self {
        Self::new(443, PROBE_TIMEOUT)
    }
}

/// Race a probe future against the deadline; first completion wins.
async fn run_with_deadline<F>(probe: F, deadline: Duration) -> CheckOutcome
where
    F: Future<Output = Result<DateTime<Utc>, CertWatchError>>,
{
    let result = match timeout(deadline, probe).await {
        Ok(inner) => inner,
        Err(_elapsed) => Err(CertWatchError::ProbeTimeout { duration: deadline }),
    };

    match result {
        Ok(expires) => CheckOutcome::Valid { expires },
        Err(CertWatchError::ProbeTimeout { .. }) => CheckOutcome::TimedOut,
        Err(e) => CheckOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

/// Parse the not-after timestamp out of a DER-encoded certificate
fn parse_not_after(der_bytes: &[u8]) -> Result<DateTime<Utc>, CertWatchError> {
    let (_, cert) = X509Certificate::from_der(der_bytes)
        .map_err(|e| CertWatchError::probe(format!("failed to parse certificate: {:?}", e)))?;

    let ts = cert.validity().not_after.timestamp();
    DateTime::<Utc>::from_timestamp(ts, 0)
        .ok_or_else(|| CertWatchError::probe("certificate not-after out of range"))
}

/// Resolve a hostname to its first IP address
async fn resolve_hostname(hostname: &str) -> Result<IpAddr, CertWatchError> {
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
    let response = resolver
        .lookup_ip(hostname)
        .await
        .map_err(|e| CertWatchError::probe(format!("DNS lookup failed for {}: {}", hostname, e)))?;

    response
        .iter()
        .next()
        .ok_or_else(|| CertWatchError::probe(format!("no IP addresses found for {}", hostname)))
}
