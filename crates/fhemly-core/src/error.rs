// ── Core error types ──
//
// User-facing errors from fhemly-core. Command submission never surfaces
// these: every reply is classified into a `CommandOutcome` instead. They
// only escape from start-up operations (inventory, version, config).

use thiserror::Error;

/// A request that produced no usable reply: no response, timeout, or a
/// non-success status. The single failure shape the UI distinguishes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct TransportFailure {
    pub reason: String,
    /// HTTP status, when the server answered at all.
    pub status: Option<u16>,
}

impl TransportFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            status: None,
        }
    }

    pub fn with_status(reason: impl Into<String>, status: u16) -> Self {
        Self {
            reason: reason.into(),
            status: Some(status),
        }
    }
}

impl From<fhemly_api::Error> for TransportFailure {
    fn from(err: fhemly_api::Error) -> Self {
        match err.status() {
            Some(status) => Self::with_status(err.to_string(), status),
            None => Self::new(err.to_string()),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach server: {0}")]
    Transport(#[from] TransportFailure),

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Inventory could not be decoded: {message}")]
    InvalidInventory { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fhemly_api::Error> for CoreError {
    fn from(err: fhemly_api::Error) -> Self {
        match err {
            fhemly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fhemly_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS setup failed: {msg}"),
            },
            fhemly_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidInventory { message }
            }
            other @ (fhemly_api::Error::Transport(_) | fhemly_api::Error::Status { .. }) => {
                CoreError::Transport(TransportFailure::from(other))
            }
        }
    }
}
