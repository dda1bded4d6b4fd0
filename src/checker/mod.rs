// Certificate status checker - single bounded TLS probe per hostname

pub mod probe;

pub use probe::{CertificateProbe, CheckOutcome, TlsProbe, PROBE_TIMEOUT};
