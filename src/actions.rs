//! Tool buttons addressed by action identifier.
//!
//! The [`ActionManager`] is the single owner of every clickable tool button.
//! Whoever needs a button (the toolbar, the panel) refers to it by [`Id`]
//! and subscribes to its `clicked` signal; the host calls
//! [`ActionManager::trigger`] when the user activates it.

use std::collections::BTreeMap;
use std::fmt;

use crate::signal::{Signal, SubscriptionId};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(String);

impl Id {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct ToolButton {
    id: Id,
    tooltip: String,
    checkable: bool,
    checked: bool,
    clicked: Signal<bool>,
}

impl ToolButton {
    fn new(id: Id, checkable: bool) -> Self {
        Self {
            id,
            tooltip: String::new(),
            checkable,
            checked: false,
            clicked: Signal::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }

    pub fn is_checkable(&self) -> bool {
        self.checkable
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Update the check state without emitting `clicked`.
    pub fn set_checked(&mut self, checked: bool) {
        if self.checkable {
            self.checked = checked;
        }
    }

    /// Emitted on activation with the new check state (always `false` for
    /// plain buttons).
    pub fn clicked(&mut self) -> &mut Signal<bool> {
        &mut self.clicked
    }

    fn click(&mut self) {
        if self.checkable {
            self.checked = !self.checked;
        }
        let checked = self.checked;
        self.clicked.emit(&checked);
    }
}

#[derive(Debug, Default)]
pub struct ActionManager {
    buttons: BTreeMap<Id, ToolButton>,
}

impl ActionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a button under `id`, reusing an existing one.
    pub fn register(&mut self, id: &str, checkable: bool) -> &mut ToolButton {
        self.buttons
            .entry(Id::new(id))
            .or_insert_with(|| ToolButton::new(Id::new(id), checkable))
    }

    /// Register a button under `id` and connect `on_click` to it.
    pub fn create_tool_button<F>(
        &mut self,
        id: &str,
        checkable: bool,
        on_click: F,
    ) -> SubscriptionId
    where
        F: FnMut(&bool) + 'static,
    {
        self.register(id, checkable).clicked().connect(on_click)
    }

    pub fn tool_button(&self, id: &str) -> Option<&ToolButton> {
        self.buttons.get(&Id::new(id))
    }

    pub fn tool_button_mut(&mut self, id: &str) -> Option<&mut ToolButton> {
        self.buttons.get_mut(&Id::new(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.buttons.contains_key(&Id::new(id))
    }

    /// Simulate a user click. Returns `false` for unknown ids.
    pub fn trigger(&mut self, id: &str) -> bool {
        match self.buttons.get_mut(&Id::new(id)) {
            Some(button) => {
                button.click();
                true
            }
            None => {
                tracing::warn!(id, "trigger for unknown tool button");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn checkable_button_toggles_and_reports_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut actions = ActionManager::new();
        let s = seen.clone();
        actions.create_tool_button("Panel_Front", true, move |on| s.borrow_mut().push(*on));
        assert!(actions.trigger("Panel_Front"));
        assert!(actions.trigger("Panel_Front"));
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn plain_button_never_checks() {
        let mut actions = ActionManager::new();
        let button = actions.register("Tool_Min", false);
        button.set_checked(true);
        assert!(!button.is_checked());
        assert!(!actions.trigger("missing"));
    }
}
