// Hostname normalization
//
// Records are keyed by a normalized host string: any URL scheme and a leading
// "www." are stripped before lookup. Case is preserved; the uniqueness key is
// the string the operator submitted, minus decoration.

use crate::error::CertWatchError;

/// Normalize a raw URL or hostname into the canonical record key.
///
/// `https://www.Example.com/path` becomes `Example.com`. A leading `www.` is
/// stripped only at the front; inner labels are untouched.
pub fn normalize(raw: &str) -> Result<String, CertWatchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed(raw));
    }

    // Strip the scheme by hand instead of going through a URL parser, which
    // would lowercase the host and lose the submitted spelling.
    let without_scheme = match trimmed.split_once("://") {
        Some((_, rest)) => rest,
        None => trimmed,
    };

    // Drop any path, query or fragment.
    let host_port = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    // Drop an embedded port; probes always go to the standard HTTPS port.
    let host = host_port.split(':').next().unwrap_or_default();

    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() || !is_valid_host(host) {
        return Err(malformed(raw));
    }

    Ok(host.to_string())
}

fn is_valid_host(host: &str) -> bool {
    host.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
        && host.chars().any(|c| c.is_ascii_alphanumeric())
        && !host.starts_with('.')
        && !host.ends_with('.')
}

fn malformed(input: &str) -> CertWatchError {
    CertWatchError::MalformedHostname {
        input: input.to_string(),
    }
}
