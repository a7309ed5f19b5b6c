//! Observer lists used to wire collaborators together.
//!
//! A [`Signal`] owns the subscriber callbacks for one event. Emission runs
//! subscribers synchronously, in connection order, on the calling thread.
//! One-shot subscribers are dropped after their first delivery.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber<T> {
    id: SubscriptionId,
    once: bool,
    callback: Box<dyn FnMut(&T)>,
}

pub struct Signal<T> {
    subscribers: Vec<Subscriber<T>>,
    next_id: u64,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    fn push(&mut self, once: bool, callback: Box<dyn FnMut(&T)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, once, callback });
        id
    }

    pub fn connect<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        self.push(false, Box::new(callback))
    }

    /// Subscribe for the next emission only.
    pub fn connect_once<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        self.push(true, Box::new(callback))
    }

    pub fn disconnect(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    pub fn emit(&mut self, value: &T) {
        for sub in &mut self.subscribers {
            (sub.callback)(value);
        }
        self.subscribers.retain(|s| !s.once);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
