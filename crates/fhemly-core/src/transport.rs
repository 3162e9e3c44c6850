// ── Transport port ──
//
// The core only ever needs "send this command, give me the body or tell
// me it failed". The HTTP client implements it; tests script it.

use std::future::Future;

use fhemly_api::FhemClient;
use tracing::debug;

use crate::error::TransportFailure;

/// Sends a single textual command and returns the raw reply body.
///
/// Implementations must treat any non-success reply (no response, timeout,
/// error status) as a [`TransportFailure`]. An empty body is a success.
pub trait CommandTransport: Send + Sync + 'static {
    fn send(&self, command: &str)
    -> impl Future<Output = Result<String, TransportFailure>> + Send;
}

impl CommandTransport for FhemClient {
    async fn send(&self, command: &str) -> Result<String, TransportFailure> {
        self.execute(command).await.map_err(|e| {
            debug!(%command, error = %e, transient = e.is_transient(), "command request failed");
            TransportFailure::from(e)
        })
    }
}
