use ratatui::prelude::Rect;

use crate::constants::{
    PanelMetrics, SCALE_ZOOMIN_FACTOR, SCALE_ZOOMOUT_FACTOR, SETTINGS_HEIGHT,
    SETTINGS_WIDTH, SETTINGS_X, SETTINGS_Y,
};
use crate::settings::SettingsStore;

/// Screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Contents margins of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    pub const fn uniform(value: i32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

/// Dimensions of the screen hosting the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub width: i32,
    pub height: i32,
}

/// Signed window rectangle, as stored in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PanelGeometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First-launch geometry: a slightly widened minimum-width panel, three
    /// quarters of the screen tall, hugging the top-right corner.
    pub fn default_for_screen(screen: ScreenInfo, metrics: &PanelMetrics) -> Self {
        let width = (f64::from(metrics.min_width) * SCALE_ZOOMIN_FACTOR) as i32;
        let height = (f64::from(screen.height) * SCALE_ZOOMOUT_FACTOR) as i32;
        Self {
            x: screen.width - width - metrics.screen_margin,
            y: metrics.screen_margin,
            width,
            height,
        }
    }

    /// Read the persisted geometry. All four keys must hold valid integers.
    pub fn read(settings: &dyn SettingsStore) -> Option<Self> {
        Some(Self {
            x: settings.int(SETTINGS_X)?,
            y: settings.int(SETTINGS_Y)?,
            width: settings.int(SETTINGS_WIDTH)?,
            height: settings.int(SETTINGS_HEIGHT)?,
        })
    }

    pub fn write(&self, settings: &mut dyn SettingsStore) {
        settings.set_int(SETTINGS_X, self.x);
        settings.set_int(SETTINGS_Y, self.y);
        settings.set_int(SETTINGS_WIDTH, self.width);
        settings.set_int(SETTINGS_HEIGHT, self.height);
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x.saturating_add(self.width)
            && point.y < self.y.saturating_add(self.height)
    }

    /// Map onto a terminal area, clipping whatever falls outside `bounds`.
    pub fn resolve(&self, bounds: Rect) -> Rect {
        let x0 = self.x.max(i32::from(bounds.x));
        let y0 = self.y.max(i32::from(bounds.y));
        let x1 = self
            .x
            .saturating_add(self.width)
            .min(i32::from(bounds.x) + i32::from(bounds.width));
        let y1 = self
            .y
            .saturating_add(self.height)
            .min(i32::from(bounds.y) + i32::from(bounds.height));
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        }
    }
}

/// Size limits enforced on the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraints {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl SizeConstraints {
    /// Panel limits: metrics bound the width, the screen bounds the height.
    pub fn for_panel(metrics: &PanelMetrics, screen: ScreenInfo) -> Self {
        Self {
            min_width: metrics.min_width,
            min_height: metrics.min_height,
            max_width: metrics.max_width,
            max_height: screen.height.max(metrics.min_height),
        }
    }

    pub fn clamp(&self, geometry: PanelGeometry) -> PanelGeometry {
        PanelGeometry {
            width: geometry.width.clamp(self.min_width, self.max_width),
            height: geometry.height.clamp(self.min_height, self.max_height),
            ..geometry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    const SCREEN: ScreenInfo = ScreenInfo {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn first_launch_defaults() {
        let metrics = PanelMetrics::desktop();
        let g = PanelGeometry::default_for_screen(SCREEN, &metrics);
        assert_eq!(g.width, 336);
        assert_eq!(g.height, 810);
        assert_eq!(g.x, 1920 - 336 - 20);
        assert_eq!(g.y, 20);
    }

    #[test]
    fn terminal_defaults_hug_the_corner() {
        let screen = ScreenInfo {
            width: 100,
            height: 40,
        };
        let g = PanelGeometry::default_for_screen(screen, &PanelMetrics::terminal());
        assert_eq!(g, PanelGeometry::new(100 - 36 - 1, 1, 36, 30));
    }

    #[test]
    fn read_requires_all_four_keys() {
        let mut s = MemorySettings::new();
        PanelGeometry::new(1, 2, 300, 600).write(&mut s);
        assert_eq!(
            PanelGeometry::read(&s),
            Some(PanelGeometry::new(1, 2, 300, 600))
        );
        s.remove(SETTINGS_HEIGHT);
        assert_eq!(PanelGeometry::read(&s), None);
        s.set_text(SETTINGS_HEIGHT, "tall");
        assert_eq!(PanelGeometry::read(&s), None);
    }

    #[test]
    fn clamp_enforces_limits() {
        let c = SizeConstraints::for_panel(&PanelMetrics::desktop(), SCREEN);
        let g = c.clamp(PanelGeometry::new(0, 0, 10, 5000));
        assert_eq!(g.width, 280);
        assert_eq!(g.height, 1080);
        let g = c.clamp(PanelGeometry::new(0, 0, 900, 10));
        assert_eq!(g.width, 600);
        assert_eq!(g.height, 500);
    }

    #[test]
    fn resolve_clips_to_bounds() {
        let bounds = Rect::new(0, 0, 80, 24);
        let r = PanelGeometry::new(-5, 20, 20, 10).resolve(bounds);
        assert_eq!(r, Rect::new(0, 20, 15, 4));
        let off = PanelGeometry::new(100, 0, 10, 10).resolve(bounds);
        assert_eq!(off, Rect::default());
    }

    #[test]
    fn contains_is_half_open() {
        let g = PanelGeometry::new(10, 10, 5, 5);
        assert!(g.contains(Point::new(10, 10)));
        assert!(g.contains(Point::new(14, 14)));
        assert!(!g.contains(Point::new(15, 10)));
    }
}
