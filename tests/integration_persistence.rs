use std::time::{Duration, Instant};

use rim_panel::constants::{PanelMetrics, SETTINGS_TOP_HINT, SETTINGS_WIDTH, TOOL_PANEL_FRONT};
use rim_panel::event_loop::ControlFlow;
use rim_panel::geometry::{PanelGeometry, ScreenInfo};
use rim_panel::host::TerminalHost;
use rim_panel::panel::{MainPanel, PanelState};
use rim_panel::settings::{JsonSettings, SettingsStore};
use rim_panel::window::PanelWindow;

const SCREEN: ScreenInfo = ScreenInfo {
    width: 100,
    height: 40,
};

fn open_panel(path: &std::path::Path) -> MainPanel<TerminalHost, JsonSettings> {
    let settings = JsonSettings::open(path).unwrap();
    MainPanel::new(TerminalHost::new(SCREEN), settings, PanelMetrics::terminal())
}

#[test]
fn first_launch_writes_defaults_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let panel = open_panel(&path);
    assert_eq!(panel.window().geometry(), PanelGeometry::new(63, 1, 36, 30));
    drop(panel);

    let stored = JsonSettings::open(&path).unwrap();
    assert_eq!(stored.int(SETTINGS_WIDTH), Some(36));
    assert_eq!(stored.bool(SETTINGS_TOP_HINT), Some(false));
}

#[test]
fn geometry_and_pin_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let now = Instant::now();

    let mut panel = open_panel(&path);
    assert!(panel.trigger_tool(TOOL_PANEL_FRONT, now));
    panel.move_window(10, 2);
    panel.resize_window(40, 20);
    assert!(panel.request_close(now));
    assert_eq!(panel.state(), PanelState::Closing);
    assert_eq!(panel.poll_timers(now), ControlFlow::Continue);
    assert_eq!(
        panel.poll_timers(now + Duration::from_millis(50)),
        ControlFlow::Quit
    );
    drop(panel);

    let panel = open_panel(&path);
    assert!(panel.is_pinned());
    assert_eq!(panel.window().geometry(), PanelGeometry::new(10, 2, 40, 20));
    let pin = panel.actions().tool_button(TOOL_PANEL_FRONT).unwrap();
    assert_eq!(pin.tooltip(), "Unstick");
}

#[test]
fn moves_are_only_persisted_on_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut panel = open_panel(&path);
    panel.move_window(5, 5);
    panel.teardown().unwrap();
    drop(panel);

    let panel = open_panel(&path);
    assert_eq!(panel.window().geometry().origin().x, 63);
}

#[test]
fn broken_geometry_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "Main/x": 3, "Main/y": "oops", "Main/width": 40, "Main/height": 20 }"#,
    )
    .unwrap();

    let panel = open_panel(&path);
    assert_eq!(panel.window().geometry(), PanelGeometry::new(63, 1, 36, 30));
    drop(panel);

    let stored = JsonSettings::open(&path).unwrap();
    assert_eq!(stored.int("Main/y"), Some(1));
}

#[test]
fn truncated_settings_file_still_starts_the_panel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "Main/x": 3, "Main/y": 4, "Main/wid"#).unwrap();

    let panel = open_panel(&path);
    assert_eq!(panel.window().geometry(), PanelGeometry::new(63, 1, 36, 30));
    drop(panel);

    let stored = JsonSettings::open(&path).unwrap();
    assert_eq!(stored.int("Main/x"), Some(63));
    assert!(dir.path().join("settings.json.bad").exists());
}
