//! Console screen: device tree on the left, the visible center panel on
//! the right, and the command field underneath.

use std::cell::RefCell;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fhemly_core::{Device, PanelId, PanelRegistry, TreeNode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use tracing::debug;
use tui_tree_widget::{Tree, TreeItem, TreeState};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const WELCOME_TEXT: &str = "Select a device in the tree to see its details.\n\n\
Type any FHEM command into the field below and press Enter to send it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tree,
    Command,
}

pub struct ConsoleScreen {
    tree: Option<Arc<TreeNode>>,
    items: Vec<TreeItem<'static, usize>>,
    tree_state: RefCell<TreeState<usize>>,
    panels: PanelRegistry,
    device: Option<Device>,
    command: String,
    focus: Focus,
    load_error: Option<String>,
}

impl ConsoleScreen {
    pub fn new() -> Self {
        Self {
            tree: None,
            items: Vec::new(),
            tree_state: RefCell::new(TreeState::default()),
            panels: PanelRegistry::default(),
            device: None,
            command: String::new(),
            focus: Focus::default(),
            load_error: None,
        }
    }

    fn set_tree(&mut self, tree: Arc<TreeNode>) -> Result<()> {
        self.items = tree_items(&tree)?;

        let mut state = TreeState::default();
        for (idx, group) in tree.children.iter().enumerate() {
            if group.expanded {
                state.open(vec![idx]);
            }
        }
        if !tree.children.is_empty() {
            state.select(vec![0]);
        }
        self.tree_state = RefCell::new(state);
        self.tree = Some(tree);
        self.load_error = None;
        Ok(())
    }

    /// Tree "click": a device opens its detail panel, a group toggles.
    fn activate_selected(&mut self) {
        let state = self.tree_state.get_mut();
        let path = state.selected().to_vec();
        let device = self
            .tree
            .as_ref()
            .and_then(|tree| tree.device_at(&path))
            .cloned();

        match device {
            Some(device) => {
                debug!(device = %device.name, "showing device detail");
                self.panels.show_exclusive(PanelId::DeviceDetail);
                self.device = Some(device);
            }
            None => {
                state.toggle_selected();
            }
        }
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        let state = self.tree_state.get_mut();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                state.key_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.key_down();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                state.key_left();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                state.key_right();
            }
            KeyCode::Home | KeyCode::Char('g') => {
                state.select_first();
            }
            KeyCode::End | KeyCode::Char('G') => {
                state.select_last();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selected(),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => return Some(Action::Execute(self.command.clone())),
            KeyCode::Backspace => {
                self.command.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.command.clear();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.command.push(c);
            }
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_tree(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Devices ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focus == Focus::Tree {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.tree.is_none() {
            let text = self.load_error.as_deref().unwrap_or("Loading…");
            frame.render_widget(
                Paragraph::new(Span::styled(text, theme::key_hint()))
                    .wrap(Wrap { trim: true })
                    .block(block),
                area,
            );
            return;
        }

        match Tree::new(&self.items) {
            Ok(tree) => {
                let tree = tree
                    .block(block)
                    .highlight_style(theme::table_selected())
                    .highlight_symbol("▸ ");
                frame.render_stateful_widget(tree, area, &mut self.tree_state.borrow_mut());
            }
            Err(e) => {
                debug!(error = %e, "tree widget rejected items");
                frame.render_widget(block, area);
            }
        }
    }

    fn render_center(&self, frame: &mut Frame, area: Rect) {
        match (self.panels.visible(), &self.device) {
            (Some(PanelId::DeviceDetail), Some(device)) => render_device(frame, area, device),
            (Some(PanelId::Welcome), _) => render_welcome(frame, area),
            _ => frame.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
                area,
            ),
        }
    }

    fn render_command(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Command;
        let block = Block::default()
            .title(" Command ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let text = if focused {
            format!("{}\u{2588}", self.command)
        } else {
            self.command.clone()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme::NEON_CYAN))).block(block),
            area,
        );
    }
}

impl Default for ConsoleScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ConsoleScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Tree => Focus::Command,
                    Focus::Command => Focus::Tree,
                };
                return Ok(None);
            }
            KeyCode::F(2) => {
                let pending = Some(self.command.clone()).filter(|c| !c.trim().is_empty());
                return Ok(Some(Action::SaveConfig(pending)));
            }
            KeyCode::F(5) => return Ok(Some(Action::Execute(self.command.clone()))),
            _ => {}
        }

        Ok(match self.focus {
            Focus::Tree => {
                self.handle_tree_key(key);
                None
            }
            Focus::Command => self.handle_command_key(key),
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TreeLoaded(tree) => self.set_tree(Arc::clone(tree))?,
            Action::LoadFailed(message) => self.load_error = Some(message.clone()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [left, right] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(70),
        ])
        .areas(area);
        let [center, command] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(right);

        self.render_tree(frame, left);
        self.render_center(frame, center);
        self.render_command(frame, command);
    }

    fn id(&self) -> &str {
        "console"
    }
}

/// Tree widget items for the children of `root`, identified by child index
/// so a selection path maps straight onto [`TreeNode::get`].
fn tree_items(root: &TreeNode) -> std::io::Result<Vec<TreeItem<'static, usize>>> {
    root.children
        .iter()
        .enumerate()
        .map(|(idx, node)| tree_item(idx, node))
        .collect()
}

fn tree_item(idx: usize, node: &TreeNode) -> std::io::Result<TreeItem<'static, usize>> {
    let label = node_label(node);
    if node.children.is_empty() {
        return Ok(TreeItem::new_leaf(idx, label));
    }
    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| tree_item(i, child))
        .collect::<std::io::Result<Vec<_>>>()?;
    TreeItem::new(idx, label, children)
}

fn node_label(node: &TreeNode) -> Line<'static> {
    let style = if node.payload.is_some() {
        theme::table_row()
    } else if node.is_leaf {
        theme::key_hint()
    } else {
        Style::default()
            .fg(theme::NEON_CYAN)
            .add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(node.label.clone(), style))
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", PanelId::Welcome.title()))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    frame.render_widget(
        Paragraph::new(WELCOME_TEXT)
            .style(theme::table_row())
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn render_device(frame: &mut Frame, area: Rect, device: &Device) {
    let block = Block::default()
        .title(format!(" {} ", device.name))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let rows: Vec<Row> = device
        .attribute_rows()
        .map(|(key, value)| {
            Row::new(vec![
                Cell::from(Span::styled(key.to_owned(), Style::default().fg(theme::CORAL))),
                Cell::from(value),
            ])
            .style(theme::table_row())
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(30), Constraint::Percentage(70)])
        .header(Row::new(vec!["Attribute", "Value"]).style(theme::table_header()))
        .block(block);
    frame.render_widget(table, area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fhemly_core::{InventoryPayload, ListGroup, build_tree};
    use pretty_assertions::assert_eq;

    use crate::testing::draw_to_text;

    impl ConsoleScreen {
        fn command(&self) -> &str {
            &self.command
        }

        fn focus(&self) -> Focus {
            self.focus
        }

        fn visible_panel(&self) -> Option<PanelId> {
            self.panels.visible()
        }

        fn shown_device(&self) -> Option<&Device> {
            self.device.as_ref()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn device(name: &str, state: &str) -> Device {
        let mut d = Device::new(name);
        d.attributes.insert("NAME".into(), name.into());
        d.attributes.insert("STATE".into(), state.into());
        d
    }

    fn loaded_screen() -> ConsoleScreen {
        let tree = build_tree(&InventoryPayload {
            groups: vec![
                ListGroup::new("Lamps", vec![device("Kitchen", "on"), device("Living", "off")]),
                ListGroup::new("Sensors", vec![]),
            ],
        });
        let mut screen = ConsoleScreen::new();
        screen.update(&Action::TreeLoaded(Arc::new(tree))).unwrap();
        screen
    }

    fn screen_text(screen: &ConsoleScreen) -> String {
        draw_to_text(80, 20, |frame| screen.render(frame, frame.area()))
    }

    #[test]
    fn starts_with_welcome_and_tree_focus() {
        let screen = ConsoleScreen::new();
        assert_eq!(screen.visible_panel(), Some(PanelId::Welcome));
        assert_eq!(screen.focus(), Focus::Tree);
        assert!(screen_text(&screen).contains("Loading"));
    }

    #[test]
    fn loaded_tree_renders_groups_and_devices() {
        let text = screen_text(&loaded_screen());
        assert!(text.contains("Lamps"));
        assert!(text.contains("Kitchen"));
        assert!(text.contains("Living"));
        assert!(text.contains("Sensors"));
    }

    #[test]
    fn enter_on_device_shows_detail_panel() {
        let mut screen = loaded_screen();
        // navigation works on what was last drawn
        screen_text(&screen);
        // first row is the group, the next one its first device
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(screen.visible_panel(), Some(PanelId::DeviceDetail));
        assert_eq!(screen.shown_device().unwrap().name, "Kitchen");
        let text = screen_text(&screen);
        assert!(text.contains("STATE"));
        assert!(!text.contains("Select a device"));
    }

    #[test]
    fn enter_on_group_keeps_current_panel() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(screen.visible_panel(), Some(PanelId::Welcome));
        assert!(screen.shown_device().is_none());
    }

    #[test]
    fn typing_goes_to_command_field_after_tab() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        for c in "list".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(screen.command(), "list");

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::Execute("list".into())));
        // the field keeps its text after sending
        assert_eq!(screen.command(), "list");

        screen.handle_key_event(key(KeyCode::Backspace)).unwrap();
        assert_eq!(screen.command(), "lis");
    }

    #[test]
    fn function_keys_carry_field_text() {
        let mut screen = ConsoleScreen::new();
        assert_eq!(
            screen.handle_key_event(key(KeyCode::F(2))).unwrap(),
            Some(Action::SaveConfig(None))
        );

        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        screen.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(
            screen.handle_key_event(key(KeyCode::F(2))).unwrap(),
            Some(Action::SaveConfig(Some("x".into())))
        );
        assert_eq!(
            screen.handle_key_event(key(KeyCode::F(5))).unwrap(),
            Some(Action::Execute("x".into()))
        );
    }

    #[test]
    fn load_failure_is_shown_in_tree_pane() {
        let mut screen = ConsoleScreen::new();
        screen
            .update(&Action::LoadFailed("connection refused".into()))
            .unwrap();
        assert!(screen_text(&screen).contains("connection refused"));
    }
}
