//! Window-chrome toolbar: icon, tool buttons, minimize and close.

use bitflags::bitflags;

use crate::actions::{ActionManager, Id};
use crate::constants::{TOOL_CLOSE, TOOL_MIN};
use crate::geometry::PanelGeometry;
use crate::images::WindowIcon;

bitflags! {
    /// Standard elements a toolbar shows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ToolFlags: u8 {
        const ICON = 1 << 0;
        const MIN = 1 << 1;
        const CLOSE = 1 << 2;
        /// Stretch between the icon and the buttons.
        const SPACER = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSlot {
    Icon,
    Spacer,
    Button(Id),
}

#[derive(Debug, Default)]
pub struct ToolBar {
    flags: ToolFlags,
    slots: Vec<ToolSlot>,
    icon: Option<WindowIcon>,
    geometry: PanelGeometry,
}

impl ToolBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out the standard elements for `flags`, registering the minimize
    /// and close buttons with `actions`. Owners subscribe to their clicks
    /// through the action manager.
    pub fn set_tool_flags(&mut self, flags: ToolFlags, actions: &mut ActionManager) {
        self.flags = flags;
        self.slots.clear();
        if flags.contains(ToolFlags::ICON) {
            self.slots.push(ToolSlot::Icon);
        }
        if flags.contains(ToolFlags::SPACER) {
            self.slots.push(ToolSlot::Spacer);
        }
        if flags.contains(ToolFlags::MIN) {
            actions.register(TOOL_MIN, false).set_tooltip("Minimize");
            self.slots.push(ToolSlot::Button(Id::new(TOOL_MIN)));
        }
        if flags.contains(ToolFlags::CLOSE) {
            actions.register(TOOL_CLOSE, false).set_tooltip("Close");
            self.slots.push(ToolSlot::Button(Id::new(TOOL_CLOSE)));
        }
    }

    pub fn flags(&self) -> ToolFlags {
        self.flags
    }

    /// Insert `button` before the slot holding `before`, or at the end when
    /// `before` is not on the toolbar. Returns `false` if `button` is already
    /// present.
    pub fn insert_tool_button(&mut self, button: Id, before: &str) -> bool {
        if self.contains(button.as_str()) {
            return false;
        }
        let pos = self
            .slots
            .iter()
            .position(|slot| matches!(slot, ToolSlot::Button(id) if id.as_str() == before))
            .unwrap_or(self.slots.len());
        self.slots.insert(pos, ToolSlot::Button(button));
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| matches!(slot, ToolSlot::Button(b) if b.as_str() == id))
    }

    pub fn slots(&self) -> &[ToolSlot] {
        &self.slots
    }

    /// Button ids in display order.
    pub fn button_ids(&self) -> impl Iterator<Item = &Id> {
        self.slots.iter().filter_map(|slot| match slot {
            ToolSlot::Button(id) => Some(id),
            _ => None,
        })
    }

    pub fn set_window_icon(&mut self, icon: WindowIcon) {
        self.icon = Some(icon);
    }

    pub fn window_icon(&self) -> Option<&WindowIcon> {
        self.icon.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: PanelGeometry) {
        self.geometry = geometry;
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOOL_PANEL_FRONT;

    #[test]
    fn flags_produce_ordered_slots() {
        let mut actions = ActionManager::new();
        let mut bar = ToolBar::new();
        bar.set_tool_flags(
            ToolFlags::ICON | ToolFlags::MIN | ToolFlags::CLOSE | ToolFlags::SPACER,
            &mut actions,
        );
        assert_eq!(
            bar.slots(),
            &[
                ToolSlot::Icon,
                ToolSlot::Spacer,
                ToolSlot::Button(Id::new(TOOL_MIN)),
                ToolSlot::Button(Id::new(TOOL_CLOSE)),
            ]
        );
        assert!(actions.contains(TOOL_MIN));
        assert!(actions.contains(TOOL_CLOSE));
    }

    #[test]
    fn insert_before_minimize() {
        let mut actions = ActionManager::new();
        let mut bar = ToolBar::new();
        bar.set_tool_flags(ToolFlags::MIN | ToolFlags::CLOSE, &mut actions);
        assert!(bar.insert_tool_button(Id::new(TOOL_PANEL_FRONT), TOOL_MIN));
        assert!(!bar.insert_tool_button(Id::new(TOOL_PANEL_FRONT), TOOL_MIN));
        let ids: Vec<&str> = bar.button_ids().map(Id::as_str).collect();
        assert_eq!(ids, vec![TOOL_PANEL_FRONT, TOOL_MIN, TOOL_CLOSE]);
    }
}
