// Test doubles shared by the core's unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::time::Instant;

use crate::error::TransportFailure;
use crate::notice::Notice;
use crate::surface::Surface;
use crate::transport::CommandTransport;

type Reply = Result<String, TransportFailure>;

/// Transport answering from per-command queues. Commands with nothing
/// queued fail as if the server were down.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    log: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, command: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(command.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Times at which `command` was sent.
    pub(crate) fn sent_at(&self, command: &str) -> Vec<Instant> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == command)
            .map(|(_, at)| *at)
            .collect()
    }
}

impl CommandTransport for ScriptedTransport {
    async fn send(&self, command: &str) -> Reply {
        self.log
            .lock()
            .unwrap()
            .push((command.to_owned(), Instant::now()));
        self.replies
            .lock()
            .unwrap()
            .get_mut(command)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportFailure::new("connection refused")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceEvent {
    Notice(Notice),
    Mask(String),
    Unmask,
    Reload,
}

#[derive(Default)]
pub(crate) struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub(crate) fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Surface for RecordingSurface {
    fn notify(&self, notice: Notice) {
        self.push(SurfaceEvent::Notice(notice));
    }

    fn mask(&self, message: &str) {
        self.push(SurfaceEvent::Mask(message.to_owned()));
    }

    fn unmask(&self) {
        self.push(SurfaceEvent::Unmask);
    }

    fn reload(&self) {
        self.push(SurfaceEvent::Reload);
    }
}
