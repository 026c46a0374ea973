//! Subscriber lists for the stores.
//!
//! Stores live on the UI thread, so listeners are plain boxed closures
//! without `Send` bounds. Each listener receives the store itself and
//! recomputes whatever it renders.

use std::fmt;

/// Handle returned by `subscribe`, used to unsubscribe on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<T> = Box<dyn Fn(&T)>;

/// Ordered list of listeners for values of type `T`.
pub struct Subscribers<T> {
    next_id: u64,
    listeners: Vec<(Subscription, Listener<T>)>,
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a listener; listeners run in registration order.
    pub fn subscribe(&mut self, listener: impl Fn(&T) + 'static) -> Subscription {
        self.next_id += 1;
        let handle = Subscription(self.next_id);
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() < before
    }

    pub fn notify(&self, value: &T) {
        for (_, listener) in &self.listeners {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
