use thiserror::Error;

/// Top-level error type for the `fhemly-api` crate.
///
/// Covers every failure mode of the single command endpoint. `fhemly-core`
/// collapses all of these into a transport failure for the UI.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered, but with a non-success status.
    #[error("Server returned HTTP {status}")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient_client_errors_are_not() {
        let unavailable = Error::Status {
            status: 503,
            body: String::new(),
        };
        let not_found = Error::Status {
            status: 404,
            body: String::new(),
        };
        assert!(unavailable.is_transient());
        assert!(!not_found.is_transient());
        assert_eq!(not_found.status(), Some(404));
    }

    #[test]
    fn decode_errors_have_no_status() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "garbage".into(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.status(), None);
    }
}
