//! Observable state store
//!
//! Every controller keeps its state in a [`Store`]: mutation methods go
//! through [`Store::update`], which notifies the registered view callbacks
//! with the new state. This replaces framework-driven re-rendering with an
//! explicit state-plus-subscriber model.
//!
//! # Example
//!
//! ```
//! use folio_core::store::Store;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let store = Store::new(0u32);
//! let seen = Rc::new(Cell::new(0));
//!
//! let s = seen.clone();
//! let handle = store.subscribe(move |v| s.set(*v));
//!
//! store.update(|v| *v += 2);
//! assert_eq!(seen.get(), 2);
//!
//! store.unsubscribe(handle);
//! store.update(|v| *v += 1);
//! assert_eq!(seen.get(), 2);
//! ```
//!
//! Subscribers must not mutate the store that is notifying them.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// A single observable state value
pub struct Store<T> {
    state: RefCell<T>,
    subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
    next_id: Cell<u64>,
}

/// Handle for unsubscribing from store updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle {
    id: u64,
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: RefCell::new(initial),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Borrow the current state
    pub fn read(&self) -> Ref<'_, T> {
        self.state.borrow()
    }

    /// Read a projection of the state
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.state.borrow())
    }

    /// Replace the state and notify subscribers
    pub fn set(&self, state: T) {
        *self.state.borrow_mut() = state;
        self.notify();
    }

    /// Update the state using a closure and notify subscribers
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.state.borrow_mut());
        self.notify();
    }

    /// Update state and return a value
    ///
    /// Subscribers are notified only when the closure reports a change
    /// through the returned `(changed, value)` pair.
    pub fn update_with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> (bool, R),
    {
        let (changed, result) = f(&mut self.state.borrow_mut());
        if changed {
            self.notify();
        }
        result
    }

    /// Subscribe to state changes
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        SubscriptionHandle { id }
    }

    /// Remove a subscription. Returns false if it was already removed.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != handle.id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify(&self) {
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| Rc::clone(s))
            .collect();
        let state = self.state.borrow();
        for subscriber in subscribers {
            subscriber(&state);
        }
    }
}

impl<T: Clone> Store<T> {
    /// Clone out the current state
    pub fn get(&self) -> T {
        self.state.borrow().clone()
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_notifies_in_subscription_order() {
        let store = Store::new(1i32);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        store.subscribe(move |v| l.borrow_mut().push(("a", *v)));
        let l = log.clone();
        store.subscribe(move |v| l.borrow_mut().push(("b", *v)));

        store.update(|v| *v = 5);
        assert_eq!(*log.borrow(), vec![("a", 5), ("b", 5)]);
    }

    #[test]
    fn test_update_with_skips_notify_when_unchanged() {
        let store = Store::new(3i32);
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        store.subscribe(move |_| c.set(c.get() + 1));

        let r = store.update_with(|v| (false, *v * 2));
        assert_eq!(r, 6);
        assert_eq!(calls.get(), 0);

        store.update_with(|v| {
            *v = 4;
            (true, ())
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(store.get(), 4);
    }

    #[test]
    fn test_unsubscribe_only_removes_one() {
        let store = Store::new(());
        let a = store.subscribe(|_| {});
        let _b = store.subscribe(|_| {});

        assert!(store.unsubscribe(a));
        assert!(!store.unsubscribe(a));
        assert_eq!(store.subscriber_count(), 1);
    }
}
