// ── Console facade ──
//
// Ties the command channel, restart recovery and inventory loading to one
// transport and one surface. Cheaply cloneable; clones share the recovery
// phase.

use std::sync::Arc;

use fhemly_api::{FhemClient, JsonList, version_banner};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::builder::build_tree;
use crate::command::{CommandChannel, CommandOutcome, ConsoleCommand};
use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{InventoryPayload, TreeNode};
use crate::recovery::{
    DEFAULT_PROBE_COMMAND, ReconnectState, RecoveryConfig, RecoveryOutcome, RecoveryPhase,
    RecoveryTracker, RestartRecovery,
};
use crate::surface::Surface;
use crate::transport::CommandTransport;

/// Client-side release shown next to the server version.
pub const FRONTEND_VERSION: &str = concat!("fhemly ", env!("CARGO_PKG_VERSION"));

/// Status bar text: `"<server version>; Frontend Version: <frontend>"`.
pub fn status_text(server_version: &str) -> String {
    format!("{server_version}; Frontend Version: {FRONTEND_VERSION}")
}

/// The console as seen by a UI.
pub struct Console<T> {
    inner: Arc<ConsoleInner<T>>,
}

struct ConsoleInner<T> {
    transport: Arc<T>,
    surface: Arc<dyn Surface>,
    channel: CommandChannel<T>,
    recovery: RecoveryConfig,
    tracker: RecoveryTracker,
}

/// Console over HTTP, as used by the binaries.
pub type HttpConsole = Console<FhemClient>;

impl<T> Clone for Console<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl HttpConsole {
    /// Console talking HTTP to the server named in `config`.
    pub fn from_config(
        config: &ConsoleConfig,
        surface: Arc<dyn Surface>,
    ) -> Result<Self, CoreError> {
        let client = config.client()?;
        debug!(url = %config.url, "console client ready");
        Ok(Self::new(Arc::new(client), surface, config.recovery.clone()))
    }
}

impl<T: CommandTransport> Console<T> {
    pub fn new(transport: Arc<T>, surface: Arc<dyn Surface>, recovery: RecoveryConfig) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                channel: CommandChannel::new(Arc::clone(&transport), Arc::clone(&surface)),
                transport,
                surface,
                recovery,
                tracker: RecoveryTracker::default(),
            }),
        }
    }

    // ── Start-up ─────────────────────────────────────────────────────

    /// Fetch the grouped inventory with `jsonlist`.
    pub async fn load_inventory(&self) -> Result<InventoryPayload, CoreError> {
        let body = self.inner.transport.send(DEFAULT_PROBE_COMMAND).await?;
        let list = JsonList::from_body(body)?;
        let payload = InventoryPayload::from(list);
        info!(groups = payload.groups.len(), "inventory loaded");
        Ok(payload)
    }

    /// Fetch the inventory and build the device tree from it.
    pub async fn load_tree(&self) -> Result<TreeNode, CoreError> {
        Ok(build_tree(&self.load_inventory().await?))
    }

    /// First line of the server's `version` reply.
    pub async fn server_version(&self) -> Result<String, CoreError> {
        let body = self.inner.transport.send("version").await?;
        Ok(version_banner(&body).to_owned())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Submit user text. `None` when the text is blank.
    pub async fn submit(&self, command: &str) -> Option<CommandOutcome> {
        self.inner.channel.submit(command).await
    }

    /// Persist the configuration. Non-blank `pending` command text is
    /// submitted first, so an edit typed but not yet sent is saved too.
    pub async fn save_config(&self, pending: Option<&str>) -> CommandOutcome {
        if let Some(pending) = pending {
            self.submit(pending).await;
        }
        self.inner.channel.dispatch(ConsoleCommand::Save).await
    }

    pub async fn shutdown(&self) -> CommandOutcome {
        self.inner.channel.dispatch(ConsoleCommand::Shutdown).await
    }

    // ── Restart ──────────────────────────────────────────────────────

    fn recovery(&self) -> RestartRecovery<T> {
        RestartRecovery::with_tracker(
            Arc::clone(&self.inner.transport),
            Arc::clone(&self.inner.surface),
            self.inner.recovery.clone(),
            self.inner.tracker.clone(),
        )
    }

    /// Restart the server and wait for it to come back.
    pub async fn run_recovery(&self) -> RecoveryOutcome {
        let running = self.inner.tracker.running();
        if running > 0 {
            warn!(running, "restart requested while a recovery is already running");
        }
        self.recovery().run().await
    }

    /// Restart in the background. A restart issued while another recovery
    /// is running starts a second, independent loop; the phase stays
    /// active until every loop has finished.
    pub fn restart(&self) -> JoinHandle<RecoveryOutcome> {
        let console = self.clone();
        tokio::spawn(async move { console.run_recovery().await })
    }

    pub fn recovery_phase(&self) -> RecoveryPhase {
        self.inner.tracker.phase()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<RecoveryPhase> {
        self.inner.tracker.subscribe()
    }

    pub fn reconnect_state(&self) -> ReconnectState {
        ReconnectState {
            active: self.inner.tracker.running() > 0,
            interval: self.inner.recovery.interval,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::TransportFailure;
    use crate::notice::Notice;
    use crate::testing::{RecordingSurface, ScriptedTransport, SurfaceEvent};

    fn console(
        transport: ScriptedTransport,
    ) -> (Console<ScriptedTransport>, Arc<ScriptedTransport>, Arc<RecordingSurface>) {
        let transport = Arc::new(transport);
        let surface = Arc::new(RecordingSurface::default());
        let console = Console::new(
            Arc::clone(&transport),
            surface.clone(),
            RecoveryConfig::default(),
        );
        (console, transport, surface)
    }

    #[test]
    fn status_text_names_both_versions() {
        let text = status_text("fhem.pl:1.2");
        assert!(text.starts_with("fhem.pl:1.2; Frontend Version: fhemly "));
    }

    #[tokio::test]
    async fn save_submits_pending_text_first() {
        let (console, transport, surface) = console(
            ScriptedTransport::new()
                .respond("attr Kitchen room Lamps", Ok(String::new()))
                .respond("save", Ok(String::new())),
        );

        let outcome = console.save_config(Some("attr Kitchen room Lamps")).await;

        assert_eq!(outcome, CommandOutcome::Empty);
        assert_eq!(transport.commands(), ["attr Kitchen room Lamps", "save"]);
        assert_eq!(
            surface.events(),
            [
                SurfaceEvent::Notice(Notice::toast("Command submitted!")),
                SurfaceEvent::Notice(Notice::toast("Save successful!")),
            ]
        );
    }

    #[tokio::test]
    async fn save_skips_blank_pending_text() {
        let (console, transport, _surface) =
            console(ScriptedTransport::new().respond("save", Ok(String::new())));

        console.save_config(Some("  ")).await;
        console.save_config(None).await;

        assert_eq!(transport.commands(), ["save", "save"]);
    }

    #[tokio::test]
    async fn failed_save_raises_alert() {
        let (console, _transport, surface) = console(ScriptedTransport::new());

        assert!(matches!(
            console.save_config(None).await,
            CommandOutcome::Failed(_)
        ));
        assert_eq!(
            surface.events(),
            [SurfaceEvent::Notice(Notice::alert(
                "Could not save the current configuration!"
            ))]
        );
    }

    #[tokio::test]
    async fn shutdown_waits_for_the_reply() {
        let (console, _transport, surface) =
            console(ScriptedTransport::new().respond("shutdown", Ok(String::new())));

        assert_eq!(console.shutdown().await, CommandOutcome::Empty);
        assert_eq!(
            surface.events(),
            [SurfaceEvent::Notice(Notice::toast("Shutdown submitted!"))]
        );
    }

    #[tokio::test]
    async fn inventory_decodes_into_a_tree() {
        let body = r#"{"ResultSet":"full","Results":[
            {"list":"Lamps","devices":[{"NAME":"Kitchen"},{"NAME":"Living"}]},
            {"list":"Sensors","devices":[]}
        ]}"#;
        let (console, _transport, _surface) =
            console(ScriptedTransport::new().respond("jsonlist", Ok(body.into())));

        let tree = console.load_tree().await.unwrap();

        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].label, "Lamps");
        assert_eq!(tree.children[0].children.len(), 2);
        assert!(tree.children[1].is_leaf);
    }

    #[tokio::test]
    async fn inventory_rejects_a_non_json_reply() {
        let (console, _transport, _surface) = console(
            ScriptedTransport::new().respond("jsonlist", Ok("Unknown command\n".into())),
        );

        let err = console.load_inventory().await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInventory { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let (console, _transport, _surface) = console(ScriptedTransport::new());

        let err = console.server_version().await.unwrap_err();
        assert!(matches!(err, CoreError::Transport(TransportFailure { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_publishes_phase_and_reconnect_state() {
        let (console, _transport, surface) =
            console(ScriptedTransport::new().respond("jsonlist", Ok("{}".into())));

        assert_eq!(
            console.reconnect_state(),
            ReconnectState {
                active: false,
                interval: Duration::from_millis(1000),
            }
        );

        let handle = console.restart();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(console.reconnect_state().active);

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, RecoveryOutcome::Reloaded { probes: 1 });
        assert_eq!(console.recovery_phase(), RecoveryPhase::Idle);
        assert_eq!(surface.events().last(), Some(&SurfaceEvent::Reload));
    }

    #[tokio::test(start_paused = true)]
    async fn second_restart_runs_an_independent_loop() {
        let (console, transport, surface) = console(
            ScriptedTransport::new()
                .respond("jsonlist", Ok("{}".into()))
                .respond("jsonlist", Ok("{}".into())),
        );

        let first = console.restart();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = console.restart();

        assert!(matches!(first.await.unwrap(), RecoveryOutcome::Reloaded { .. }));
        assert!(matches!(second.await.unwrap(), RecoveryOutcome::Reloaded { .. }));
        assert_eq!(transport.sent_at("shutdown restart").len(), 2);
        let reloads = surface
            .events()
            .into_iter()
            .filter(|e| *e == SurfaceEvent::Reload)
            .count();
        assert_eq!(reloads, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn phase_stays_active_until_the_last_loop_ends() {
        let (console, _transport, _surface) = console(
            ScriptedTransport::new()
                .respond("jsonlist", Ok("{}".into()))
                .respond("jsonlist", Err(TransportFailure::new("connection refused")))
                .respond("jsonlist", Ok("{}".into())),
        );

        let first = console.restart();
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = console.restart();

        assert_eq!(first.await.unwrap(), RecoveryOutcome::Reloaded { probes: 1 });
        assert_ne!(console.recovery_phase(), RecoveryPhase::Idle);
        assert!(console.reconnect_state().active);

        assert_eq!(second.await.unwrap(), RecoveryOutcome::Reloaded { probes: 2 });
        assert_eq!(console.recovery_phase(), RecoveryPhase::Idle);
        assert!(!console.reconnect_state().active);
    }

    #[tokio::test]
    async fn http_console_submits_through_the_command_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhem"))
            .and(query_param("cmd", "list"))
            .and(query_param("XHR", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Kitchen=on"))
            .expect(1)
            .mount(&server)
            .await;

        let config = ConsoleConfig {
            url: format!("{}/fhem", server.uri()).parse().unwrap(),
            ..ConsoleConfig::default()
        };
        let surface = Arc::new(RecordingSurface::default());
        let console = HttpConsole::from_config(&config, surface.clone()).unwrap();

        let outcome = console.submit("list").await;

        assert_eq!(outcome, Some(CommandOutcome::Text("Kitchen=on".into())));
        assert_eq!(
            surface.events(),
            [SurfaceEvent::Notice(Notice::response("Kitchen=on"))]
        );
    }

    #[tokio::test]
    async fn http_console_reports_server_errors_as_alerts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = ConsoleConfig {
            url: format!("{}/fhem", server.uri()).parse().unwrap(),
            ..ConsoleConfig::default()
        };
        let surface = Arc::new(RecordingSurface::default());
        let console = HttpConsole::from_config(&config, surface.clone()).unwrap();

        let outcome = console.submit("set Kitchen on").await.unwrap();

        assert!(matches!(outcome, CommandOutcome::Failed(_)));
        assert_eq!(
            surface.events(),
            [SurfaceEvent::Notice(Notice::alert(
                "Could not submit the command!"
            ))]
        );
    }
}
