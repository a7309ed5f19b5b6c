//! Single-instance slot for the personal-info editor.
//!
//! The slot holds at most one window. When the held window is destroyed,
//! whether through [`EditWindowSlot::destroy`] or by someone calling
//! `destroy` on the window itself, its one-shot `destroyed` subscription
//! marks the slot empty. Every accessor honours that mark, so the slot reads
//! as empty from the moment the notification fires.

use std::cell::Cell;
use std::rc::Rc;

use crate::window::SecondaryWindow;

#[derive(Debug)]
pub struct EditWindowSlot<W> {
    window: Option<W>,
    released: Rc<Cell<bool>>,
}

impl<W: SecondaryWindow> EditWindowSlot<W> {
    pub fn new() -> Self {
        Self {
            window: None,
            released: Rc::new(Cell::new(false)),
        }
    }

    /// Drop a window that announced its destruction.
    fn reconcile(&mut self) {
        if self.released.replace(false) {
            self.window = None;
            tracing::debug!("edit window slot cleared");
        }
    }

    /// Show the editor, building it with `factory` if the slot is empty.
    ///
    /// A minimized editor is restored to its normal state.
    pub fn open<F>(&mut self, factory: F) -> &mut W
    where
        F: FnOnce() -> W,
    {
        self.reconcile();
        let released = self.released.clone();
        let window = self.window.get_or_insert_with(|| {
            let mut window = factory();
            window.destroyed().connect_once(move |_| released.set(true));
            tracing::debug!("edit window created");
            window
        });
        if window.is_minimized() {
            window.show_normal();
        } else {
            window.show();
        }
        window
    }

    pub fn is_open(&self) -> bool {
        self.window.is_some() && !self.released.get()
    }

    pub fn get(&self) -> Option<&W> {
        if self.released.get() {
            return None;
        }
        self.window.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.reconcile();
        self.window.as_mut()
    }

    /// Close the editor through its own destroy path. The `destroyed`
    /// subscription empties the slot. Returns `false` when nothing was open.
    pub fn close(&mut self) -> bool {
        self.reconcile();
        let Some(window) = self.window.as_mut() else {
            return false;
        };
        window.destroy();
        self.reconcile();
        true
    }

    /// Destroy the held window, if any, and empty the slot.
    pub fn destroy(&mut self) {
        self.reconcile();
        if let Some(window) = self.window.as_mut()
            && !window.is_destroyed()
        {
            window.destroy();
        }
        self.window = None;
        self.released.set(false);
    }
}

impl<W: SecondaryWindow> Default for EditWindowSlot<W> {
    fn default() -> Self {
        Self::new()
    }
}
