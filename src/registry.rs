//! Keyed-singleton ownership of secondary widgets.
//!
//! Each key maps to at most one widget. Asking for a key that already has an
//! entry hands back the existing widget untouched, so a chat window is never
//! duplicated no matter how often its contact is activated. A widget destroyed
//! behind the registry's back is rebuilt on the next request. Entries are only
//! released by [`WidgetRegistry::remove_all`] when the owner shuts down.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt::Debug;

use crate::window::SecondaryWindow;

#[derive(Debug)]
pub struct WidgetRegistry<K: Ord, W> {
    entries: BTreeMap<K, W>,
}

impl<K: Ord + Copy + Debug, W> WidgetRegistry<K, W> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&W> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut W> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &W)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut W)> {
        self.entries.iter_mut()
    }
}

impl<K: Ord + Copy + Debug, W: SecondaryWindow> WidgetRegistry<K, W> {
    /// Return the live widget for `key`, building it with `factory` on first
    /// use or when the stored one was destroyed elsewhere.
    ///
    /// Display is left to the caller.
    pub fn get_or_create<F>(&mut self, key: K, factory: F) -> &mut W
    where
        F: FnOnce() -> W,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                let widget = entry.into_mut();
                if widget.is_destroyed() {
                    tracing::debug!(?key, "replacing destroyed registry entry");
                    *widget = factory();
                }
                widget
            }
            Entry::Vacant(entry) => {
                tracing::debug!(?key, "creating registry entry");
                entry.insert(factory())
            }
        }
    }

    /// Destroy every owned widget and empty the registry.
    ///
    /// Widgets that were already destroyed elsewhere are dropped without a
    /// second destroy. Returns the number of widgets destroyed here.
    pub fn remove_all(&mut self) -> usize {
        let mut destroyed = 0;
        for (key, mut widget) in std::mem::take(&mut self.entries) {
            if widget.is_destroyed() {
                tracing::debug!(?key, "registry entry already destroyed");
                continue;
            }
            widget.destroy();
            destroyed += 1;
        }
        destroyed
    }
}

impl<K: Ord + Copy + Debug, W> Default for WidgetRegistry<K, W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowLifecycle;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Probe {
        lifecycle: WindowLifecycle,
        serial: usize,
    }

    impl SecondaryWindow for Probe {
        fn lifecycle(&self) -> &WindowLifecycle {
            &self.lifecycle
        }

        fn lifecycle_mut(&mut self) -> &mut WindowLifecycle {
            &mut self.lifecycle
        }
    }

    #[test]
    fn repeated_requests_construct_once() {
        let built = Cell::new(0);
        let mut reg: WidgetRegistry<u32, Probe> = WidgetRegistry::new();
        for _ in 0..5 {
            let probe = reg.get_or_create(9, || {
                built.set(built.get() + 1);
                Probe {
                    serial: built.get(),
                    ..Probe::default()
                }
            });
            assert_eq!(probe.serial, 1);
        }
        assert_eq!(built.get(), 1);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_widgets() {
        let mut reg: WidgetRegistry<u32, Probe> = WidgetRegistry::new();
        reg.get_or_create(1, || Probe {
            serial: 1,
            ..Probe::default()
        });
        reg.get_or_create(2, || Probe {
            serial: 2,
            ..Probe::default()
        });
        assert_eq!(reg.get(&1).map(|p| p.serial), Some(1));
        assert_eq!(reg.get(&2).map(|p| p.serial), Some(2));
        assert_eq!(reg.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn get_or_create_does_not_show() {
        let mut reg: WidgetRegistry<u32, Probe> = WidgetRegistry::new();
        let probe = reg.get_or_create(1, Probe::default);
        assert!(!probe.is_visible());
    }

    #[test]
    fn destroyed_entry_is_rebuilt_on_request() {
        let mut reg: WidgetRegistry<u32, Probe> = WidgetRegistry::new();
        reg.get_or_create(1, || Probe {
            serial: 1,
            ..Probe::default()
        });
        if let Some(probe) = reg.get_mut(&1) {
            probe.destroy();
        }
        let probe = reg.get_or_create(1, || Probe {
            serial: 2,
            ..Probe::default()
        });
        probe.show();
        assert_eq!(probe.serial, 2);
        assert!(!probe.is_destroyed());
        assert!(probe.is_visible());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_all_skips_externally_destroyed() {
        let notified = Rc::new(Cell::new(0));
        let mut reg: WidgetRegistry<u32, Probe> = WidgetRegistry::new();
        for key in 0..3 {
            let probe = reg.get_or_create(key, Probe::default);
            let n = notified.clone();
            probe.destroyed().connect(move |_| n.set(n.get() + 1));
        }
        if let Some(probe) = reg.get_mut(&1) {
            probe.destroy();
        }
        assert_eq!(notified.get(), 1);
        assert_eq!(reg.remove_all(), 2);
        assert_eq!(notified.get(), 3);
        assert!(reg.is_empty());
    }
}
