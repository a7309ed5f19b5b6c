use crate::contacts::ItemId;

/// Which window receives keyboard input in the terminal host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Panel,
    Chat(ItemId),
    Edit,
}

#[derive(Debug, Default, Clone)]
pub struct AppState {
    focus: Focus,
    help_visible: bool,
    /// Item whose hover card was requested from the keyboard.
    hovered: Option<ItemId>,
    status: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            tracing::debug!(?focus, "focus changed");
        }
        self.focus = focus;
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn set_help_visible(&mut self, visible: bool) {
        self.help_visible = visible;
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.hovered
    }

    /// Replace the hovered item, returning the previous one.
    pub fn set_hovered(&mut self, item: Option<ItemId>) -> Option<ItemId> {
        std::mem::replace(&mut self.hovered, item)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hovered_swap_returns_previous() {
        let mut state = AppState::new();
        assert_eq!(state.set_hovered(Some(ItemId(1))), None);
        assert_eq!(state.set_hovered(Some(ItemId(2))), Some(ItemId(1)));
        assert_eq!(state.set_hovered(None), Some(ItemId(2)));
    }

    #[test]
    fn help_toggles() {
        let mut state = AppState::new();
        state.toggle_help();
        assert!(state.help_visible());
        state.toggle_help();
        assert!(!state.help_visible());
    }
}
