//! Keyboard routing between the terminal and the panel.

use std::sync::mpsc::Sender;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use super::{EditView, TerminalHost};
use crate::constants::{TOOL_CLOSE, TOOL_MIN, TOOL_PANEL_FRONT};
use crate::contacts::ItemId;
use crate::event_loop::ControlFlow;
use crate::geometry::{ScreenInfo, SizeConstraints};
use crate::host::help::HelpPage;
use crate::panel::{MainPanel, PanelCommand, PanelError, PanelState};
use crate::settings::SettingsStore;
use crate::shortcuts::Action;
use crate::state::{AppState, Focus};
use crate::ui::UiFrame;
use crate::window::{PanelWindow, SecondaryWindow};

pub type TerminalPanel<S> = MainPanel<TerminalHost, S>;

pub struct App<S: SettingsStore> {
    panel: TerminalPanel<S>,
    state: AppState,
    help: HelpPage,
    /// Stands in for the tray icon's requests.
    tray: Sender<PanelCommand>,
    last_tick: Instant,
}

impl<S: SettingsStore> App<S> {
    pub fn new(panel: TerminalPanel<S>, now: Instant) -> Self {
        let help = HelpPage::new(panel.shortcuts());
        let tray = panel.commands();
        let mut app = Self {
            panel,
            state: AppState::new(),
            help,
            tray,
            last_tick: now,
        };
        app.sync_scroll();
        app
    }

    pub fn panel(&self) -> &TerminalPanel<S> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut TerminalPanel<S> {
        &mut self.panel
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn help(&self) -> &HelpPage {
        &self.help
    }

    /// Timers, queued commands and animations. Runs once per loop pass.
    pub fn on_idle(&mut self, now: Instant) -> ControlFlow {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.panel.tick(elapsed);
        self.panel.process_commands(now);
        self.panel.poll_timers(now)
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Resize(cols, rows) => {
                self.resize_screen(*cols, *rows);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn resize_screen(&mut self, cols: u16, rows: u16) {
        let screen = ScreenInfo {
            width: i32::from(cols),
            height: i32::from(rows),
        };
        let constraints = SizeConstraints::for_panel(self.panel.metrics(), screen);
        self.panel.host_mut().set_screen(screen);
        self.panel.window_mut().set_size_constraints(constraints);
        self.panel.handle_resize();
        self.sync_scroll();
    }

    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> ControlFlow {
        if self.panel.state() == PanelState::Closing {
            return ControlFlow::Continue;
        }
        if self.state.help_visible() {
            self.handle_help_key(key);
            return ControlFlow::Continue;
        }
        let action = self.panel.shortcuts().action_for_key(key);
        if action == Some(Action::Quit) {
            self.send_tray(PanelCommand::Quit);
        } else if key.code == KeyCode::BackTab {
            self.cycle_focus();
        } else {
            match self.state.focus() {
                Focus::Panel => self.handle_panel_key(key, action, now),
                Focus::Chat(item) => self.handle_chat_key(item, key),
                Focus::Edit => self.handle_edit_key(key),
            }
        }
        self.panel.process_commands(now);
        ControlFlow::Continue
    }

    fn send_tray(&self, command: PanelCommand) {
        if self.tray.send(command).is_err() {
            tracing::debug!(?command, "panel no longer accepts commands");
        }
    }

    fn handle_help_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.help.scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => self.help.scroll(1),
            KeyCode::PageUp => self.help.scroll(-10),
            KeyCode::PageDown => self.help.scroll(10),
            _ => {
                self.help.reset();
                self.state.set_help_visible(false);
            }
        }
    }

    fn handle_panel_key(&mut self, key: &KeyEvent, action: Option<Action>, now: Instant) {
        if self.panel.window().is_minimized() {
            if action == Some(Action::ShowPanel) {
                self.send_tray(PanelCommand::ShowMainPanel);
            }
            return;
        }
        if key.code == KeyCode::Tab {
            self.cycle_focus();
            return;
        }
        let Some(action) = action else {
            return;
        };
        match action {
            Action::ClosePanel => {
                self.panel.trigger_tool(TOOL_CLOSE, now);
            }
            Action::MinimizePanel => {
                self.hide_hover();
                self.panel.trigger_tool(TOOL_MIN, now);
            }
            Action::TogglePin => {
                self.panel.trigger_tool(TOOL_PANEL_FRONT, now);
            }
            Action::ShowPanel => self.send_tray(PanelCommand::ShowMainPanel),
            Action::SelectNext => self.move_selection(1),
            Action::SelectPrev => self.move_selection(-1),
            Action::OpenChat => {
                if let Some(item) = self.selected() {
                    self.hide_hover();
                    if self.panel.show_chat_window(item) {
                        self.state.set_focus(Focus::Chat(item));
                    }
                }
            }
            Action::ToggleHover => {
                if let Some(item) = self.selected() {
                    if self.state.hovered() == Some(item) {
                        self.hide_hover();
                    } else {
                        self.hide_hover();
                        if self.panel.show_hover_item(true, item) {
                            self.state.set_hovered(Some(item));
                        }
                    }
                }
            }
            Action::EditProfile => {
                self.hide_hover();
                self.panel.show_personal_edit_window();
                self.state.set_focus(Focus::Edit);
            }
            Action::CloseWindow => self.hide_hover(),
            Action::ToggleHelp => self.state.toggle_help(),
            Action::Quit => {}
        }
    }

    fn handle_chat_key(&mut self, item: ItemId, key: &KeyEvent) {
        if key.code == KeyCode::Tab {
            self.cycle_focus();
            return;
        }
        let Some(chat) = self.panel.chat_windows_mut().get_mut(&item) else {
            self.state.set_focus(Focus::Panel);
            return;
        };
        match key.code {
            KeyCode::Esc => {
                chat.hide();
                self.state.set_focus(Focus::Panel);
            }
            KeyCode::Enter => {
                chat.send();
            }
            KeyCode::Backspace => chat.backspace(),
            KeyCode::Char(c) if is_text(key) => chat.push_char(c),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: &KeyEvent) {
        let Some(edit) = self.panel.edit_window_mut() else {
            self.state.set_focus(Focus::Panel);
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.panel.close_personal_edit_window();
                self.state.set_focus(Focus::Panel);
            }
            KeyCode::Enter => {
                let profile = edit.draft().clone();
                self.panel.host_mut().set_profile(profile);
                self.panel.close_personal_edit_window();
                self.state.set_focus(Focus::Panel);
            }
            KeyCode::Tab => edit.next_field(),
            KeyCode::Backspace => edit.backspace(),
            KeyCode::Char(c) if is_text(key) => edit.push_char(c),
            _ => {}
        }
    }

    fn selected(&self) -> Option<ItemId> {
        self.panel.contacts().selected_item().map(|c| c.id)
    }

    fn move_selection(&mut self, delta: isize) {
        let before = self.selected();
        self.panel.contacts_mut().move_selection(delta);
        self.sync_scroll();
        if self.selected() != before {
            // Selection leaving a row behaves like the pointer leaving it.
            self.hide_hover();
        }
    }

    fn hide_hover(&mut self) {
        if let Some(item) = self.state.set_hovered(None) {
            self.panel.show_hover_item(false, item);
        }
    }

    /// Keep the selected row inside the content area.
    fn sync_scroll(&mut self) {
        let rows = self.panel.layout().content.height / self.panel.metrics().row_height.max(1);
        self.panel
            .contacts_mut()
            .keep_selected_in_view(rows.max(0) as usize);
    }

    /// Panel, then visible chat windows in item order, then the editor.
    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Panel];
        order.extend(
            self.panel
                .chat_windows()
                .iter()
                .filter(|(_, chat)| chat.is_visible())
                .map(|(item, _)| Focus::Chat(*item)),
        );
        if self.panel.edit_window().is_some() {
            order.push(Focus::Edit);
        }
        order
    }

    fn cycle_focus(&mut self) {
        let order = self.focus_order();
        let current = order
            .iter()
            .position(|f| *f == self.state.focus())
            .unwrap_or(0);
        let next = order[(current + 1) % order.len()];
        self.state.set_focus(next);
    }

    pub fn render(&self, frame: &mut UiFrame<'_>) {
        super::render::draw(frame, self);
    }

    pub fn edit_window(&self) -> Option<&EditView> {
        self.panel.edit_window()
    }

    /// Release the panel's windows and persist shortcuts.
    pub fn shutdown(&mut self) -> Result<(), PanelError> {
        self.panel.teardown()
    }
}

fn is_text(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PanelMetrics;
    use crate::contacts::ContactList;
    use crate::settings::MemorySettings;
    use std::time::Duration;

    fn app(settings: &MemorySettings) -> App<MemorySettings> {
        let host = TerminalHost::new(ScreenInfo {
            width: 100,
            height: 40,
        });
        let mut panel = MainPanel::new(host, settings.clone(), PanelMetrics::terminal());
        panel
            .contacts_mut()
            .set_items(ContactList::sample(6).items().to_vec());
        App::new(panel, Instant::now())
    }

    fn press(app: &mut App<MemorySettings>, code: KeyCode) {
        app.handle_key(&KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    #[test]
    fn enter_opens_chat_and_esc_hides_it() {
        let settings = MemorySettings::new();
        let mut app = app(&settings);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state().focus(), Focus::Chat(ItemId(2)));
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state().focus(), Focus::Panel);
        let chat = app.panel().chat_windows().get(&ItemId(2)).unwrap();
        assert!(!chat.is_visible());
        assert_eq!(chat.messages(), ["me: hi".to_string()]);

        // Reopening reuses the same window and its history.
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.panel().chat_windows().len(), 1);
        let chat = app.panel().chat_windows().get(&ItemId(2)).unwrap();
        assert!(chat.is_visible());
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn moving_selection_hides_hover() {
        let settings = MemorySettings::new();
        let mut app = app(&settings);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.panel().hover().is_live(&ItemId(1)));
        press(&mut app, KeyCode::Down);
        assert!(!app.panel().hover().is_live(&ItemId(1)));
        assert_eq!(app.panel().hover().fading_out_count(), 1);
        app.on_idle(Instant::now() + Duration::from_secs(1));
        assert_eq!(app.panel().hover().fading_out_count(), 0);
    }

    #[test]
    fn edit_profile_saves_on_enter() {
        let settings = MemorySettings::new();
        let mut app = app(&settings);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state().focus(), Focus::Edit);
        press(&mut app, KeyCode::Char('!'));
        press(&mut app, KeyCode::Enter);
        assert!(app.edit_window().is_none());
        assert_eq!(app.panel().host().profile().name, "Me!");
        assert_eq!(app.state().focus(), Focus::Panel);
    }

    #[test]
    fn minimize_then_restore_through_tray() {
        let settings = MemorySettings::new();
        let mut app = app(&settings);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.panel().state(), PanelState::Minimized);
        press(&mut app, KeyCode::Enter);
        assert!(app.panel().chat_windows().is_empty());
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.panel().state(), PanelState::Restored);
    }

    #[test]
    fn ctrl_q_closes_then_quits_after_delay() {
        let settings = MemorySettings::new();
        let mut app = app(&settings);
        let now = Instant::now();
        app.handle_key(
            &KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
            now,
        );
        assert_eq!(app.panel().state(), PanelState::Closing);
        assert!(settings.contains("Main/width"));
        assert_eq!(
            app.on_idle(now + Duration::from_millis(60)),
            ControlFlow::Quit
        );
    }

    #[test]
    fn tab_cycles_through_open_windows() {
        let settings = MemorySettings::new();
        let mut app = app(&settings);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state().focus(), Focus::Panel);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.state().focus(), Focus::Panel);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state().focus(), Focus::Chat(ItemId(1)));
    }
}
