// ── Restart recovery ──
//
// After `shutdown restart` the server is down for an unknown time. The
// recovery masks the UI, then probes once per interval, strictly one
// request at a time, until a probe answer passes the readiness check.
// It ends by asking the surface to reload; resuming in place would keep
// a stale inventory around.
//
// Polling is unbounded unless `RecoveryConfig` sets a maximum attempt
// count or a deadline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::command::{CommandChannel, ConsoleCommand};
use crate::error::TransportFailure;
use crate::notice::Notice;
use crate::surface::Surface;
use crate::transport::CommandTransport;

/// Reply of a server that is up but has not finished loading its modules.
pub const NOT_READY_MARKER: &str = "Unknown command JsonList, try help\n";

pub const DEFAULT_PROBE_COMMAND: &str = "jsonlist";

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(1000);

pub const RESTART_MASK_MESSAGE: &str = "Please wait while FHEM is restarting...";

/// Alert shown when a bounded recovery gives up.
pub const RECOVERY_ABANDONED_MESSAGE: &str = "The server did not come back after the restart!";

/// Decides whether a probe answer means the server is usable again.
///
/// An answer is ready when it is not the not-ready marker and starts with
/// `ready_prefix`. With an empty prefix every answer except the marker
/// counts as ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessProbe {
    pub ready_prefix: String,
    pub not_ready_marker: String,
}

impl Default for ReadinessProbe {
    fn default() -> Self {
        Self {
            ready_prefix: "{".into(),
            not_ready_marker: NOT_READY_MARKER.into(),
        }
    }
}

impl ReadinessProbe {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            ready_prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn is_ready(&self, body: &str) -> bool {
        body != self.not_ready_marker && body.starts_with(self.ready_prefix.as_str())
    }

    pub fn evaluate(&self, reply: &Result<String, TransportFailure>) -> ProbeOutcome {
        match reply {
            Err(_) => ProbeOutcome::Unreachable,
            Ok(body) if self.is_ready(body) => ProbeOutcome::Ready,
            Ok(_) => ProbeOutcome::NotReady,
        }
    }
}

/// Readiness check with the default probe settings.
pub fn is_server_ready(body: &str) -> bool {
    ReadinessProbe::default().is_ready(body)
}

/// Result of a single liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No usable reply; the server is still down.
    Unreachable,
    /// The server answered, but not with a recognised inventory.
    NotReady,
    Ready,
}

/// Where the recovery currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecoveryPhase {
    #[default]
    Idle,
    /// The restart command was issued; polling has not started.
    AwaitingRestart,
    /// Probing. `attempt` counts probes sent so far.
    Polling { attempt: u32 },
    /// The server is back; the surface is reloading.
    Reloading,
}

/// Snapshot of the reconnect bookkeeping shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectState {
    pub active: bool,
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Delay before each probe, including the first.
    pub interval: Duration,
    /// Give up after this many probes.
    pub max_attempts: Option<u32>,
    /// Give up once polling has run this long.
    pub deadline: Option<Duration>,
    pub probe_command: String,
    pub readiness: ReadinessProbe,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_PROBE_INTERVAL,
            max_attempts: None,
            deadline: None,
            probe_command: DEFAULT_PROBE_COMMAND.into(),
            readiness: ReadinessProbe::default(),
        }
    }
}

/// How a recovery run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// The server came back and the surface was asked to reload.
    Reloaded { probes: u32 },
    /// A configured bound was hit first. Never happens when unbounded.
    Abandoned { probes: u32 },
}

impl RecoveryOutcome {
    pub fn probes(self) -> u32 {
        match self {
            Self::Reloaded { probes } | Self::Abandoned { probes } => probes,
        }
    }
}

/// Phase channel and running-loop count shared by every recovery of one
/// console. The phase only returns to `Idle` when the last loop ends.
#[derive(Debug, Clone)]
pub struct RecoveryTracker {
    phase: Arc<watch::Sender<RecoveryPhase>>,
    running: Arc<AtomicUsize>,
}

impl Default for RecoveryTracker {
    fn default() -> Self {
        let (phase, _) = watch::channel(RecoveryPhase::Idle);
        Self {
            phase: Arc::new(phase),
            running: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl RecoveryTracker {
    pub fn subscribe(&self) -> watch::Receiver<RecoveryPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> RecoveryPhase {
        *self.phase.borrow()
    }

    /// Number of recovery loops currently running.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    fn publish(&self, phase: RecoveryPhase) {
        debug!(?phase, "recovery phase");
        self.phase.send_replace(phase);
    }

    fn begin(&self) -> RunningGuard<'_> {
        self.running.fetch_add(1, Ordering::SeqCst);
        RunningGuard(self)
    }

    fn end(&self) {
        let remaining = self.running.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        if remaining == 0 {
            self.publish(RecoveryPhase::Idle);
        } else {
            debug!(remaining, "recovery finished, others still running");
        }
    }
}

/// Counts a loop as running until dropped, including on cancellation.
struct RunningGuard<'a>(&'a RecoveryTracker);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.end();
    }
}

/// One restart-and-wait operation.
pub struct RestartRecovery<T> {
    channel: CommandChannel<T>,
    transport: Arc<T>,
    surface: Arc<dyn Surface>,
    config: RecoveryConfig,
    tracker: RecoveryTracker,
}

impl<T: CommandTransport> RestartRecovery<T> {
    pub fn new(transport: Arc<T>, surface: Arc<dyn Surface>, config: RecoveryConfig) -> Self {
        Self::with_tracker(transport, surface, config, RecoveryTracker::default())
    }

    /// Report progress through an existing tracker.
    pub fn with_tracker(
        transport: Arc<T>,
        surface: Arc<dyn Surface>,
        config: RecoveryConfig,
        tracker: RecoveryTracker,
    ) -> Self {
        Self {
            channel: CommandChannel::new(Arc::clone(&transport), Arc::clone(&surface)),
            transport,
            surface,
            config,
            tracker,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RecoveryPhase> {
        self.tracker.subscribe()
    }

    pub fn phase(&self) -> RecoveryPhase {
        self.tracker.phase()
    }

    fn enter(&self, phase: RecoveryPhase) {
        self.tracker.publish(phase);
    }

    /// Restart the server and wait until it is usable again.
    pub async fn run(&self) -> RecoveryOutcome {
        let _running = self.tracker.begin();
        self.enter(RecoveryPhase::AwaitingRestart);
        info!("restarting server");

        // The server usually drops the connection before answering.
        self.channel.fire_and_forget(ConsoleCommand::Restart);
        self.surface.mask(RESTART_MASK_MESSAGE);
        self.enter(RecoveryPhase::Polling { attempt: 0 });

        let started = Instant::now();
        let mut probes: u32 = 0;

        loop {
            if self.config.max_attempts.is_some_and(|max| probes >= max) {
                return self.abandon(probes);
            }

            tokio::time::sleep(self.config.interval).await;

            if self
                .config
                .deadline
                .is_some_and(|deadline| started.elapsed() > deadline)
            {
                return self.abandon(probes);
            }

            probes += 1;
            self.enter(RecoveryPhase::Polling { attempt: probes });

            let reply = self.transport.send(&self.config.probe_command).await;
            match self.config.readiness.evaluate(&reply) {
                ProbeOutcome::Ready => {
                    info!(probes, "server is back, reloading");
                    self.enter(RecoveryPhase::Reloading);
                    self.surface.reload();
                    return RecoveryOutcome::Reloaded { probes };
                }
                outcome => debug!(probes, ?outcome, "server not ready yet"),
            }
        }
    }

    fn abandon(&self, probes: u32) -> RecoveryOutcome {
        warn!(probes, "giving up on restart recovery");
        self.surface.unmask();
        self.surface.notify(Notice::alert(RECOVERY_ABANDONED_MESSAGE));
        RecoveryOutcome::Abandoned { probes }
    }
}
