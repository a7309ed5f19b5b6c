//! Shared crate-wide constants.

use std::time::Duration;

/// Distance kept between a freshly computed desktop panel and the screen
/// edges.
///
/// Used for the first-launch geometry only: the panel is placed this many
/// units from the right edge and from the top of the screen.
pub const PANEL_MARGIN: i32 = 20;

/// Factor applied to the minimum panel width to obtain the default width.
pub const SCALE_ZOOMIN_FACTOR: f64 = 1.2;

/// Factor applied to the screen height to obtain the default panel height.
pub const SCALE_ZOOMOUT_FACTOR: f64 = 0.75;

/// Delay between persisting settings on close and terminating the
/// application. The write must reach disk before the process exits.
pub const CLOSE_QUIT_DELAY: Duration = Duration::from_millis(50);

/// Action identifier of the "stay on top" toggle button.
pub const TOOL_PANEL_FRONT: &str = "Panel_Front";

/// Action identifier of the toolbar minimize button.
pub const TOOL_MIN: &str = "Tool_Min";

/// Action identifier of the toolbar close button.
pub const TOOL_CLOSE: &str = "Tool_Close";

pub const SETTINGS_X: &str = "Main/x";
pub const SETTINGS_Y: &str = "Main/y";
pub const SETTINGS_WIDTH: &str = "Main/width";
pub const SETTINGS_HEIGHT: &str = "Main/height";
pub const SETTINGS_TOP_HINT: &str = "Main/topHint";

/// Prefix for persisted shortcut bindings, followed by the action name.
pub const SETTINGS_SHORTCUT_PREFIX: &str = "Shortcut/";

/// Sizing constants of the main panel.
///
/// Values are in the host's units: pixels for a desktop toolkit, cells for
/// the terminal host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelMetrics {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    /// Fixed height of the info area at the top of the panel.
    pub top_bar_height: i32,
    /// Fixed height of the window-chrome toolbar.
    pub tool_height: i32,
    /// Fixed height of the bottom toolbar.
    pub bottom_bar_height: i32,
    /// Height of one contact row in the content area.
    pub row_height: i32,
    /// Gap between a first-launch panel and the top-right screen corner.
    pub screen_margin: i32,
}

impl PanelMetrics {
    pub const fn desktop() -> Self {
        Self {
            min_width: 280,
            min_height: 500,
            max_width: 600,
            top_bar_height: 150,
            tool_height: 30,
            bottom_bar_height: 30,
            row_height: 50,
            screen_margin: PANEL_MARGIN,
        }
    }

    /// Metrics for hosts that measure in terminal cells.
    pub const fn terminal() -> Self {
        Self {
            min_width: 30,
            min_height: 14,
            max_width: 60,
            top_bar_height: 4,
            tool_height: 1,
            bottom_bar_height: 1,
            row_height: 1,
            screen_margin: 1,
        }
    }
}

impl Default for PanelMetrics {
    fn default() -> Self {
        Self::desktop()
    }
}
