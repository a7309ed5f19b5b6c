use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use rim_panel::constants::PanelMetrics;
use rim_panel::contacts::{ContactList, ItemId};
use rim_panel::event_loop::ControlFlow;
use rim_panel::geometry::ScreenInfo;
use rim_panel::host::TerminalHost;
use rim_panel::host::app::App;
use rim_panel::panel::{MainPanel, PanelState};
use rim_panel::settings::{MemorySettings, SettingsStore};
use rim_panel::state::Focus;
use rim_panel::ui::UiFrame;
use rim_panel::window::PanelWindow;

const COLS: u16 = 100;
const ROWS: u16 = 40;

fn app(settings: &MemorySettings) -> App<MemorySettings> {
    let host = TerminalHost::new(ScreenInfo {
        width: i32::from(COLS),
        height: i32::from(ROWS),
    });
    let mut panel = MainPanel::new(host, settings.clone(), PanelMetrics::terminal());
    *panel.contacts_mut() = ContactList::sample(40);
    let mut app = App::new(panel, Instant::now());
    app.on_idle(Instant::now());
    app
}

fn key(app: &mut App<MemorySettings>, code: KeyCode) -> ControlFlow {
    app.handle_event(
        &Event::Key(KeyEvent::new(code, KeyModifiers::NONE)),
        Instant::now(),
    )
}

fn screen_text(app: &App<MemorySettings>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(COLS, ROWS)).unwrap();
    terminal
        .draw(|frame| app.render(&mut UiFrame::new(frame)))
        .unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..ROWS {
        for x in 0..COLS {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn panel_draws_toolbar_profile_and_contacts() {
    let settings = MemorySettings::new();
    let app = app(&settings);
    let text = screen_text(&app);
    assert!(text.contains("[ ][_][x]"));
    assert!(text.contains("Me"));
    assert!(text.contains("Alice"));
    assert!(text.contains("online / 40 contacts"));
}

#[test]
fn pin_button_reflects_state() {
    let settings = MemorySettings::new();
    let mut app = app(&settings);
    key(&mut app, KeyCode::Char('p'));
    assert!(app.panel().is_pinned());
    assert_eq!(settings.bool("Main/topHint"), Some(true));
    assert!(screen_text(&app).contains("[*][_][x]"));
}

#[test]
fn chat_and_hover_windows_are_drawn() {
    let settings = MemorySettings::new();
    let mut app = app(&settings);
    key(&mut app, KeyCode::Char(' '));
    let text = screen_text(&app);
    assert!(text.contains("status line 1"));

    key(&mut app, KeyCode::Enter);
    assert_eq!(app.state().focus(), Focus::Chat(ItemId(1)));
    assert!(screen_text(&app).contains("Chat with Alice"));
}

#[test]
fn selection_scrolls_long_lists() {
    let settings = MemorySettings::new();
    let mut app = app(&settings);
    assert!(!screen_text(&app).contains("Heidi 5"));
    for _ in 0..39 {
        key(&mut app, KeyCode::Down);
    }
    assert_eq!(app.panel().contacts().selected(), 39);
    assert!(app.panel().contacts().scroll_offset() > 0);
    assert!(screen_text(&app).contains("Heidi 5"));
}

#[test]
fn help_overlay_opens_and_closes() {
    let settings = MemorySettings::new();
    let mut app = app(&settings);
    key(&mut app, KeyCode::Char('?'));
    assert!(app.state().help_visible());
    assert!(screen_text(&app).contains("Key bindings"));
    key(&mut app, KeyCode::Esc);
    assert!(!app.state().help_visible());
}

#[test]
fn minimized_panel_shows_restore_hint() {
    let settings = MemorySettings::new();
    let mut app = app(&settings);
    key(&mut app, KeyCode::Char('m'));
    assert!(app.panel().window().is_minimized());
    assert!(screen_text(&app).contains("minimized, r to restore"));
    key(&mut app, KeyCode::Char('r'));
    assert_eq!(app.panel().state(), PanelState::Restored);
}

#[test]
fn close_key_quits_after_delay() {
    let settings = MemorySettings::new();
    let mut app = app(&settings);
    let now = Instant::now();
    key(&mut app, KeyCode::Char('q'));
    assert_eq!(app.panel().state(), PanelState::Closing);
    assert!(settings.contains("Main/x"));
    assert_eq!(
        app.on_idle(now + Duration::from_millis(100)),
        ControlFlow::Quit
    );
}

#[test]
fn terminal_resize_updates_constraints() {
    let settings = MemorySettings::new();
    let mut app = app(&settings);
    app.handle_event(&Event::Resize(120, 16), Instant::now());
    let geometry = app.panel().window().geometry();
    assert_eq!(geometry.height, 16);
    assert_eq!(
        app.panel().toolbar().geometry().width,
        geometry.width - 3
    );
}
