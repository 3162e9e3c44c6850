//! Application core: event loop, overlays, and action dispatch.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fhemly_core::{ConsoleConfig, HttpConsole, Notice, RecoveryPhase, status_text};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::action::{Action, Scroll};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::loader;
use crate::screens::console::ConsoleScreen;
use crate::surface::TuiSurface;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::alert::{Alert, render_alert};
use crate::widgets::centered_rect;
use crate::widgets::mask::RestartMask;
use crate::widgets::response::ResponsePanel;
use crate::widgets::toast::{Toast, render_toast};

pub struct App {
    console: HttpConsole,
    screen: ConsoleScreen,
    /// Pending alerts; the front one is on screen.
    alerts: VecDeque<Alert>,
    response: Option<ResponsePanel>,
    toast: Option<Toast>,
    mask: Option<RestartMask>,
    server_version: Option<String>,
    phase: RecoveryPhase,
    help_visible: bool,
    running: bool,
    /// Cancels the in-flight inventory load on reload.
    load_cancel: CancellationToken,
    /// Cancels the phase watcher on exit.
    watch_cancel: CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let surface = Arc::new(TuiSurface::new(action_tx.clone()));
        let console = HttpConsole::from_config(config, surface)?;

        Ok(Self {
            console,
            screen: ConsoleScreen::new(),
            alerts: VecDeque::new(),
            response: None,
            toast: None,
            mask: None,
            server_version: None,
            phase: RecoveryPhase::Idle,
            help_visible: false,
            running: true,
            load_cancel: CancellationToken::new(),
            watch_cancel: CancellationToken::new(),
            action_tx,
            action_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        tokio::spawn(loader::watch_phase(
            self.console.clone(),
            self.action_tx.clone(),
            self.watch_cancel.clone(),
        ));
        self.spawn_load();

        let mut events = EventReader::new(Duration::from_millis(250), Duration::from_millis(33));
        info!("console event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if action == Action::Render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.load_cancel.cancel();
        self.watch_cancel.cancel();
        info!("console event loop ended");
        Ok(())
    }

    /// Fetch tree and version in the background, replacing any load
    /// still in flight.
    fn spawn_load(&mut self) {
        self.load_cancel.cancel();
        self.load_cancel = CancellationToken::new();

        let cancel = self.load_cancel.clone();
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => debug!("inventory load cancelled"),
                () = loader::load_console(console, tx) => {}
            }
        });
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Overlays take input in stacking order: mask, alert, help, response
    /// panel. Only when none is open do keys reach the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'q'))
        {
            return Ok(Some(Action::Quit));
        }

        if self.mask.is_some() {
            return Ok(None);
        }

        if !self.alerts.is_empty() {
            let dismiss = matches!(key.code, KeyCode::Enter | KeyCode::Esc);
            return Ok(dismiss.then_some(Action::DismissAlert));
        }

        if self.help_visible {
            return Ok(matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?'))
                .then_some(Action::ToggleHelp));
        }

        if self.response.is_some() {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseResponse),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollResponse(Scroll::Up)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollResponse(Scroll::Down)),
                KeyCode::PageUp => Some(Action::ScrollResponse(Scroll::PageUp)),
                KeyCode::PageDown => Some(Action::ScrollResponse(Scroll::PageDown)),
                _ => None,
            });
        }

        match key.code {
            KeyCode::F(1) => Ok(Some(Action::ToggleHelp)),
            KeyCode::F(8) => Ok(Some(Action::Shutdown)),
            KeyCode::F(9) => Ok(Some(Action::Restart)),
            _ => self.screen.handle_key_event(key),
        }
    }

    // ── Actions ──────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}
            Action::Tick => {
                if self.toast.as_ref().is_some_and(|t| t.expired(Instant::now())) {
                    self.toast = None;
                }
                if let Some(mask) = &mut self.mask {
                    mask.tick();
                }
            }
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::TreeLoaded(_) => {
                if let Some(follow_up) = self.screen.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }
            Action::LoadFailed(message) => {
                self.alerts.push_back(Alert {
                    title: "Error".into(),
                    message: message.clone(),
                });
                if let Some(follow_up) = self.screen.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }
            Action::VersionLoaded(version) => self.server_version = Some(version.clone()),
            Action::PhaseChanged(phase) => self.phase = *phase,

            Action::Notify(notice) => self.show_notice(notice.clone()),
            Action::Mask(message) => self.mask = Some(RestartMask::new(message.clone())),
            Action::Unmask => self.mask = None,
            Action::Reload => self.reload()?,

            Action::Execute(command) => {
                let console = self.console.clone();
                let command = command.clone();
                tokio::spawn(async move {
                    console.submit(&command).await;
                });
            }
            Action::SaveConfig(pending) => {
                let console = self.console.clone();
                let pending = pending.clone();
                tokio::spawn(async move {
                    console.save_config(pending.as_deref()).await;
                });
            }
            Action::Shutdown => {
                let console = self.console.clone();
                tokio::spawn(async move {
                    console.shutdown().await;
                });
            }
            Action::Restart => {
                info!("restart requested");
                self.console.restart();
            }

            Action::DismissAlert => {
                self.alerts.pop_front();
            }
            Action::CloseResponse => self.response = None,
            Action::ScrollResponse(step) => {
                if let Some(panel) = &mut self.response {
                    panel.scroll(*step);
                }
            }
        }
        Ok(())
    }

    fn show_notice(&mut self, notice: Notice) {
        match notice {
            Notice::Alert { title, message } => self.alerts.push_back(Alert { title, message }),
            Notice::Panel { title, body } => self.response = Some(ResponsePanel::new(title, body)),
            Notice::Toast { message } => self.toast = Some(Toast::new(message)),
        }
    }

    /// Throw away all console state and load everything again.
    fn reload(&mut self) -> Result<()> {
        info!("reloading console");
        self.mask = None;
        self.alerts.clear();
        self.response = None;
        self.toast = None;
        self.help_visible = false;
        self.server_version = None;
        self.screen = ConsoleScreen::new();
        self.screen.init(self.action_tx.clone())?;
        debug!(screen = self.screen.id(), "screen remounted");
        self.spawn_load();
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if let Some(mask) = &self.mask {
            mask.render(frame, area, phase_label(self.phase).as_deref());
            return;
        }

        let [main, buttons, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
                .areas(area);

        self.screen.render(frame, main);
        render_button_bar(frame, buttons);
        self.render_status_bar(frame, status);

        if let Some(panel) = &self.response {
            panel.render(frame, main);
        }
        if self.help_visible {
            render_help(frame, area);
        }
        if let Some(toast) = &self.toast {
            render_toast(frame, area, toast, Instant::now());
        }
        if let Some(alert) = self.alerts.front() {
            render_alert(frame, area, alert);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let version = self
            .server_version
            .as_deref()
            .map_or_else(|| "Connecting…".to_owned(), status_text);

        let mut spans = vec![Span::styled(format!(" {version}"), theme::status_bar())];
        if let Some(label) = phase_label(self.phase) {
            spans.push(Span::styled("  │  ", theme::key_hint()));
            spans.push(Span::styled(label, Style::default().fg(theme::ELECTRIC_YELLOW)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Status-bar wording for a recovery phase; nothing when idle.
fn phase_label(phase: RecoveryPhase) -> Option<String> {
    match phase {
        RecoveryPhase::Idle => None,
        RecoveryPhase::AwaitingRestart => Some("restart sent".into()),
        RecoveryPhase::Polling { attempt } => Some(format!("waiting for server (probe {attempt})")),
        RecoveryPhase::Reloading => Some("reloading".into()),
    }
}

fn render_button_bar(frame: &mut Frame, area: Rect) {
    let buttons = [
        ("F2", "save config"),
        ("F5", "execute"),
        ("F8", "shutdown"),
        ("F9", "restart"),
        ("Tab", "focus"),
        ("F1", "help"),
    ];
    let spans: Vec<Span> = buttons
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {key} "), theme::key_hint_key()),
                Span::styled(format!("{label} "), theme::key_hint()),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help_area = centered_rect(area, 54, 16);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let rows = [
        ("Tab", "Switch between tree and command field"),
        ("↑/↓ j/k", "Move in the device tree"),
        ("←/→ h/l", "Collapse / expand a group"),
        ("Enter", "Show device, or send command"),
        ("F2", "Save configuration"),
        ("F5", "Send command"),
        ("F8", "Shut the server down"),
        ("F9", "Restart the server"),
        ("Ctrl+U", "Clear the command field"),
        ("Ctrl+C", "Quit"),
        ("Esc", "Close this help"),
    ];
    let mut text = vec![Line::from("")];
    text.extend(rows.iter().map(|(key, what)| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(*what, theme::key_hint()),
        ])
    }));
    frame.render_widget(Paragraph::new(text), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fhemly_core::recovery::RESTART_MASK_MESSAGE;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::testing::draw_to_text;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(&ConsoleConfig::default()).unwrap()
    }

    fn app_for(server: &MockServer) -> App {
        let mut config = ConsoleConfig::default();
        config.url = format!("{}/fhem", server.uri()).parse().unwrap();
        App::new(&config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let action = app.handle_key_event(key(code)).unwrap();
        if let Some(action) = &action {
            app.process_action(action).unwrap();
        }
        action
    }

    fn screen(app: &App) -> String {
        draw_to_text(100, 30, |frame| app.render(frame))
    }

    #[test]
    fn alert_swallows_keys_until_dismissed() {
        let mut app = app();
        app.process_action(&Action::Notify(Notice::alert("Could not submit the command!")))
            .unwrap();
        assert!(screen(&app).contains("Could not submit the command!"));

        assert_eq!(press(&mut app, KeyCode::F(9)), None);
        assert_eq!(press(&mut app, KeyCode::Char('x')), None);
        assert_eq!(press(&mut app, KeyCode::Enter), Some(Action::DismissAlert));
        assert!(app.alerts.is_empty());
    }

    #[test]
    fn alerts_queue_in_arrival_order() {
        let mut app = app();
        app.process_action(&Action::Notify(Notice::alert("first"))).unwrap();
        app.process_action(&Action::Notify(Notice::alert("second"))).unwrap();

        assert!(screen(&app).contains("first"));
        press(&mut app, KeyCode::Esc);
        assert!(screen(&app).contains("second"));
    }

    #[test]
    fn mask_ignores_everything_but_quit() {
        let mut app = app();
        app.process_action(&Action::Mask(RESTART_MASK_MESSAGE.into())).unwrap();

        for code in [
            KeyCode::Enter,
            KeyCode::F(5),
            KeyCode::F(9),
            KeyCode::Esc,
            KeyCode::Char('q'),
        ] {
            assert_eq!(app.handle_key_event(key(code)).unwrap(), None);
        }
        let quit = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(quit, Some(Action::Quit));

        app.process_action(&Action::PhaseChanged(RecoveryPhase::Polling { attempt: 3 }))
            .unwrap();
        let text = screen(&app);
        assert!(text.contains(RESTART_MASK_MESSAGE));
        assert!(text.contains("probe 3"));
        assert!(!text.contains("Devices"));
    }

    #[test]
    fn response_panel_scrolls_and_closes() {
        let mut app = app();
        let body = (0..100).map(|i| format!("row {i}")).collect::<Vec<_>>().join("\n");
        app.process_action(&Action::Notify(Notice::response(&body))).unwrap();
        assert!(screen(&app).contains("row 0"));

        assert_eq!(
            press(&mut app, KeyCode::Char('j')),
            Some(Action::ScrollResponse(Scroll::Down))
        );
        assert_eq!(app.response.as_ref().unwrap().offset(), 1);
        press(&mut app, KeyCode::PageDown);
        assert!(app.response.as_ref().unwrap().offset() > 1);

        assert_eq!(press(&mut app, KeyCode::Esc), Some(Action::CloseResponse));
        assert!(app.response.is_none());
    }

    #[test]
    fn toast_shows_then_expires_on_tick() {
        let mut app = app();
        app.process_action(&Action::Notify(Notice::toast("Command submitted!")))
            .unwrap();
        assert!(screen(&app).contains("Command submitted!"));

        app.process_action(&Action::Tick).unwrap();
        assert!(app.toast.is_some());

        let long_ago = Instant::now().checked_sub(Duration::from_secs(6)).unwrap();
        app.toast = Some(Toast::shown_at("Command submitted!", long_ago));
        app.process_action(&Action::Tick).unwrap();
        assert!(app.toast.is_none());
    }

    #[test]
    fn status_bar_shows_versions_and_phase() {
        let mut app = app();
        assert!(screen(&app).contains("Connecting"));

        app.process_action(&Action::VersionLoaded("fhem.pl:1.0".into())).unwrap();
        app.process_action(&Action::PhaseChanged(RecoveryPhase::Reloading)).unwrap();
        let text = screen(&app);
        assert!(text.contains("fhem.pl:1.0; Frontend Version: fhemly"));
        assert!(text.contains("reloading"));
    }

    #[test]
    fn help_toggles_with_f1() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert!(screen(&app).contains("Keyboard Shortcuts"));
        press(&mut app, KeyCode::Esc);
        assert!(!screen(&app).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn phase_labels() {
        assert_eq!(phase_label(RecoveryPhase::Idle), None);
        assert_eq!(
            phase_label(RecoveryPhase::Polling { attempt: 2 }).as_deref(),
            Some("waiting for server (probe 2)")
        );
    }

    #[tokio::test]
    async fn reload_clears_overlays_and_screen() {
        let mut app = app();
        app.process_action(&Action::Mask("wait".into())).unwrap();
        app.process_action(&Action::Notify(Notice::response("old"))).unwrap();
        app.process_action(&Action::VersionLoaded("fhem.pl:1.0".into())).unwrap();
        app.process_action(&Action::Reload).unwrap();

        assert!(app.mask.is_none());
        assert!(app.response.is_none());
        assert!(app.server_version.is_none());
        assert!(screen(&app).contains("Loading"));
    }

    #[tokio::test]
    async fn execute_runs_command_and_reports_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhem"))
            .and(query_param("cmd", "list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Kitchen on"))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.process_action(&Action::Execute("list".into())).unwrap();

        let action = app.action_rx.recv().await.unwrap();
        assert_eq!(action, Action::Notify(Notice::response("Kitchen on")));
    }

    #[tokio::test]
    async fn save_with_empty_reply_toasts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhem"))
            .and(query_param("cmd", "save"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.process_action(&Action::SaveConfig(None)).unwrap();

        let action = app.action_rx.recv().await.unwrap();
        assert_eq!(action, Action::Notify(Notice::toast("Save successful!")));
    }
}
