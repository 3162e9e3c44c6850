//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError` and failed command outcomes into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fhemly_config::ConfigError;
use fhemly_core::{CoreError, TransportFailure};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the server: {reason}")]
    #[diagnostic(
        code(fhemly::connection_failed),
        help(
            "Check that FHEM is running and that the command endpoint is correct.\n\
             Try: fhemly --url http://<host>:8083/fhem status"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Commands ─────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(fhemly::command_failed), help("Server reply: {reason}"))]
    CommandFailed {
        message: String,
        reason: String,
        status: Option<u16>,
    },

    #[error("The server did not come back after {probes} probe(s)")]
    #[diagnostic(
        code(fhemly::restart_abandoned),
        help("Raise --max-attempts / --deadline, or check the server log.")
    )]
    RestartAbandoned { probes: u32 },

    #[error("The server sent an unreadable device list: {message}")]
    #[diagnostic(code(fhemly::invalid_inventory))]
    InvalidInventory { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fhemly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fhemly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fhemly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(fhemly::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fhemly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::CommandFailed { status: None, .. } => {
                exit_code::CONNECTION
            }
            Self::RestartAbandoned { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Error for a command the server did not accept.
    pub fn command_failed(message: &str, failure: &TransportFailure) -> Self {
        Self::CommandFailed {
            message: message.into(),
            reason: failure.reason.clone(),
            status: failure.status,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport(failure) => CliError::ConnectionFailed {
                reason: failure.reason,
            },
            CoreError::InvalidInventory { message } => CliError::InvalidInventory { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
