// ── Runtime console configuration ──
//
// These types describe *how* to reach a server and how patient the
// restart recovery is. They never touch disk: the CLI/TUI builds a
// `ConsoleConfig` (usually through `fhemly-config`) and hands it in.

use std::time::Duration;

use fhemly_api::{FhemClient, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;
use crate::recovery::RecoveryConfig;

/// Default command endpoint of a stock installation.
pub const DEFAULT_URL: &str = "http://localhost:8083/fhem";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one console session against a single server.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Command endpoint (e.g., `http://fhem.local:8083/fhem`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout. Expiry is a transport failure.
    pub timeout: Duration,
    /// Restart-recovery polling behaviour.
    pub recovery: RecoveryConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            recovery: RecoveryConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }

    /// Build the HTTP client for this configuration.
    pub fn client(&self) -> Result<FhemClient, CoreError> {
        Ok(FhemClient::new(self.url.clone(), &self.transport())?)
    }
}
