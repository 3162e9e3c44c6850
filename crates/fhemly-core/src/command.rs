// ── Command channel ──
//
// Fire one request, classify the reply, show exactly one notice. Every
// submission is independent: the channel keeps no memory of earlier
// commands, and overlapping submissions may complete in any order.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::TransportFailure;
use crate::notice::Notice;
use crate::surface::Surface;
use crate::transport::CommandTransport;

/// A command the console knows how to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Persist the running configuration.
    Save,
    /// Free text typed by the user.
    Raw(String),
    /// Stop the server.
    Shutdown,
    /// Stop the server and start it again.
    Restart,
    /// Liveness probe issued by the restart recovery.
    Probe(String),
}

impl ConsoleCommand {
    /// The literal command text sent as `cmd=`.
    pub fn as_command(&self) -> &str {
        match self {
            Self::Save => "save",
            Self::Raw(text) | Self::Probe(text) => text,
            Self::Shutdown => "shutdown",
            Self::Restart => "shutdown restart",
        }
    }

    /// Toast shown when the server accepts the command silently.
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Save => "Save successful!",
            Self::Shutdown => "Shutdown submitted!",
            Self::Restart => "Restart submitted!",
            Self::Raw(_) | Self::Probe(_) => "Command submitted!",
        }
    }

    /// Alert shown when the request fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Save => "Could not save the current configuration!",
            Self::Shutdown => "Could not submit the shutdown command!",
            Self::Restart => "Could not submit the restart command!",
            Self::Raw(_) | Self::Probe(_) => "Could not submit the command!",
        }
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_command())
    }
}

/// Classified reply to one command. Consumed immediately, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Success with an empty body.
    Empty,
    /// Success with a body to show.
    Text(String),
    /// No usable reply.
    Failed(TransportFailure),
}

impl CommandOutcome {
    /// Classify a transport result. Exhaustive and mutually exclusive.
    pub fn classify(result: Result<String, TransportFailure>) -> Self {
        match result {
            Err(failure) => Self::Failed(failure),
            Ok(body) if body.is_empty() => Self::Empty,
            Ok(body) => Self::Text(body),
        }
    }

    /// The single notice this outcome produces for `command`.
    pub fn notice(&self, command: &ConsoleCommand) -> Notice {
        match self {
            Self::Empty => Notice::toast(command.success_message()),
            Self::Text(body) => Notice::response(body),
            Self::Failed(_) => Notice::alert(command.failure_message()),
        }
    }
}

/// Sends commands over a [`CommandTransport`] and reports to a [`Surface`].
pub struct CommandChannel<T> {
    transport: Arc<T>,
    surface: Arc<dyn Surface>,
}

impl<T> Clone for CommandChannel<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            surface: Arc::clone(&self.surface),
        }
    }
}

impl<T: CommandTransport> CommandChannel<T> {
    pub fn new(transport: Arc<T>, surface: Arc<dyn Surface>) -> Self {
        Self { transport, surface }
    }

    /// Submit user text. Blank input is ignored: no request, no notice.
    pub async fn submit(&self, command: &str) -> Option<CommandOutcome> {
        if command.trim().is_empty() {
            debug!("ignoring blank command");
            return None;
        }
        Some(self.dispatch(ConsoleCommand::Raw(command.to_owned())).await)
    }

    /// Send `command`, classify the reply and show its notice.
    pub async fn dispatch(&self, command: ConsoleCommand) -> CommandOutcome {
        debug!(%command, "submitting command");
        let outcome = CommandOutcome::classify(self.transport.send(command.as_command()).await);

        match &outcome {
            CommandOutcome::Empty => info!(%command, "command accepted"),
            CommandOutcome::Text(body) => {
                info!(%command, bytes = body.len(), "command returned a response");
            }
            CommandOutcome::Failed(failure) => {
                warn!(%command, error = %failure, "command failed");
            }
        }

        self.surface.notify(outcome.notice(&command));
        outcome
    }

    /// Send `command` without waiting and without any notice. The reply,
    /// or lack of one, is only logged.
    pub fn fire_and_forget(&self, command: ConsoleCommand) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            match transport.send(command.as_command()).await {
                Ok(_) => debug!(%command, "fire-and-forget command answered"),
                Err(failure) => {
                    debug!(%command, error = %failure, "fire-and-forget command unanswered");
                }
            }
        })
    }
}
