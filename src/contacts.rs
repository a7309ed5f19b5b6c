//! Contact list shown in the panel's content area.

use std::fmt;

use crate::overlay::OverlayContent;

/// Identity of a list item. Chat windows and hover overlays are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: ItemId,
    pub name: String,
    pub signature: String,
    pub online: bool,
}

impl ContactItem {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
            signature: String::new(),
            online: false,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn status_label(&self) -> &'static str {
        if self.online { "online" } else { "offline" }
    }

    /// Info card shown while the pointer rests on the contact.
    pub fn hover_content(&self) -> OverlayContent {
        let mut content = OverlayContent::new(self.name.clone()).with_line(self.status_label());
        if !self.signature.is_empty() {
            content = content.with_line(self.signature.clone());
        }
        content
    }
}

#[derive(Debug, Default)]
pub struct ContactList {
    items: Vec<ContactItem>,
    selected: usize,
    offset: usize,
}

impl ContactList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generated roster, used when no real contacts are available.
    pub fn sample(count: usize) -> Self {
        const NAMES: [&str; 8] = [
            "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi",
        ];
        let items = (0..count)
            .map(|i| {
                let base = NAMES[i % NAMES.len()];
                let name = if i < NAMES.len() {
                    base.to_string()
                } else {
                    format!("{base} {}", i / NAMES.len() + 1)
                };
                ContactItem::new(i as u64 + 1, name)
                    .with_signature(format!("status line {}", i + 1))
                    .with_online(i % 3 != 2)
            })
            .collect();
        let mut list = Self::new();
        list.set_items(items);
        list
    }

    pub fn set_items(&mut self, items: Vec<ContactItem>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        self.offset = self.offset.min(self.selected);
    }

    pub fn items(&self) -> &[ContactItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&ContactItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ContactItem> {
        self.items.get(self.selected)
    }

    pub fn set_selected(&mut self, selected: usize) {
        self.selected = selected.min(self.items.len().saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = (self.selected + delta as usize).min(self.items.len() - 1);
        }
    }

    /// Index of the first visible row.
    pub fn scroll_offset(&self) -> usize {
        self.offset
    }

    /// Adjust the scroll offset so the selection sits within `view` rows.
    pub fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 || self.items.is_empty() {
            self.offset = 0;
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view {
            self.offset = self.selected + 1 - view;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamps_to_items() {
        let mut list = ContactList::sample(3);
        list.move_selection(1);
        assert_eq!(list.selected(), 1);
        list.move_selection(10);
        assert_eq!(list.selected(), 2);
        list.move_selection(-5);
        assert_eq!(list.selected(), 0);
        list.set_items(Vec::new());
        list.move_selection(1);
        assert_eq!(list.selected(), 0);
        assert!(list.selected_item().is_none());
    }

    #[test]
    fn offset_follows_selection() {
        let mut list = ContactList::sample(20);
        list.set_selected(9);
        list.keep_selected_in_view(4);
        assert_eq!(list.scroll_offset(), 6);
        list.set_selected(2);
        list.keep_selected_in_view(4);
        assert_eq!(list.scroll_offset(), 2);
    }

    #[test]
    fn sample_ids_are_unique() {
        let list = ContactList::sample(12);
        assert_eq!(list.index_of(ItemId(12)), Some(11));
        assert_eq!(list.get(ItemId(9)).map(|c| c.name.as_str()), Some("Alice 2"));
    }
}
