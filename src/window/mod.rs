//! Window abstractions the panel drives.
//!
//! The panel never talks to a toolkit directly. The main window implements
//! [`PanelWindow`]; chat windows and the personal-info editor implement
//! [`SecondaryWindow`], usually by embedding a [`WindowLifecycle`] that tracks
//! visibility and emits the `destroyed` notification.

use crate::geometry::{Margins, PanelGeometry, SizeConstraints};
use crate::signal::Signal;

/// The top-level panel window.
pub trait PanelWindow {
    fn geometry(&self) -> PanelGeometry;
    fn set_geometry(&mut self, geometry: PanelGeometry);
    fn set_size_constraints(&mut self, constraints: SizeConstraints);
    /// Live contents margins of the window layout.
    fn layout_margins(&self) -> Margins;
    fn stays_on_top(&self) -> bool;
    /// Toggle the stays-on-top flag. Some platforms only apply the change
    /// after the window is shown again.
    fn set_stays_on_top(&mut self, on_top: bool);
    fn show(&mut self);
    fn show_normal(&mut self);
    fn show_minimized(&mut self);
    fn is_minimized(&self) -> bool;
    fn is_visible(&self) -> bool;
}

/// Visibility bookkeeping shared by secondary windows.
#[derive(Debug, Default)]
pub struct WindowLifecycle {
    visible: bool,
    minimized: bool,
    destroyed: bool,
    destroyed_signal: Signal<()>,
}

impl WindowLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show without touching the minimized state.
    pub fn show(&mut self) {
        if self.destroyed {
            return;
        }
        self.visible = true;
    }

    pub fn show_normal(&mut self) {
        if self.destroyed {
            return;
        }
        self.visible = true;
        self.minimized = false;
    }

    pub fn show_minimized(&mut self) {
        if self.destroyed {
            return;
        }
        self.visible = true;
        self.minimized = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn destroyed(&mut self) -> &mut Signal<()> {
        &mut self.destroyed_signal
    }

    /// Mark destroyed and notify subscribers. Later calls do nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.visible = false;
        self.destroyed_signal.emit(&());
        self.destroyed_signal.clear();
    }
}

/// A window owned by the panel on behalf of a UI item.
pub trait SecondaryWindow {
    fn lifecycle(&self) -> &WindowLifecycle;
    fn lifecycle_mut(&mut self) -> &mut WindowLifecycle;

    fn show(&mut self) {
        self.lifecycle_mut().show();
    }

    fn show_normal(&mut self) {
        self.lifecycle_mut().show_normal();
    }

    fn show_minimized(&mut self) {
        self.lifecycle_mut().show_minimized();
    }

    fn hide(&mut self) {
        self.lifecycle_mut().hide();
    }

    fn is_visible(&self) -> bool {
        self.lifecycle().is_visible()
    }

    fn is_minimized(&self) -> bool {
        self.lifecycle().is_minimized()
    }

    fn is_destroyed(&self) -> bool {
        self.lifecycle().is_destroyed()
    }

    /// Emitted once when the window goes away, whatever triggered it.
    fn destroyed(&mut self) -> &mut Signal<()> {
        self.lifecycle_mut().destroyed()
    }

    fn destroy(&mut self) {
        self.lifecycle_mut().destroy();
    }
}
