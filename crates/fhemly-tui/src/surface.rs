//! [`Surface`] implementation that feeds the core's notices into the
//! app's action loop.

use fhemly_core::{Notice, Surface};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::action::Action;

pub struct TuiSurface {
    action_tx: UnboundedSender<Action>,
}

impl TuiSurface {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }

    fn send(&self, action: Action) {
        if self.action_tx.send(action).is_err() {
            debug!("action loop gone, dropping surface call");
        }
    }
}

impl Surface for TuiSurface {
    fn notify(&self, notice: Notice) {
        self.send(Action::Notify(notice));
    }

    fn mask(&self, message: &str) {
        self.send(Action::Mask(message.to_owned()));
    }

    fn unmask(&self) {
        self.send(Action::Unmask);
    }

    fn reload(&self) {
        self.send(Action::Reload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    #[test]
    fn surface_calls_become_actions_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let surface = TuiSurface::new(tx);

        surface.mask("wait");
        surface.notify(Notice::toast("done"));
        surface.unmask();
        surface.reload();

        let mut seen = Vec::new();
        while let Ok(action) = rx.try_recv() {
            seen.push(action);
        }
        assert_eq!(
            seen,
            vec![
                Action::Mask("wait".into()),
                Action::Notify(Notice::toast("done")),
                Action::Unmask,
                Action::Reload,
            ]
        );
    }

    #[test]
    fn closed_loop_is_not_an_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        TuiSurface::new(tx).notify(Notice::alert("nobody listening"));
    }
}
