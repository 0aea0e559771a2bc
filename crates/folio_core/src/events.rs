//! Pointer event dispatch
//!
//! Listeners are registered per stage node and event type, and every
//! registration returns a [`ListenerId`] that removes exactly that listener.
//! Controllers keep the ids they create and remove them on teardown, so a
//! remounted section never inherits callbacks from its previous life.
//!
//! UI dispatch is single-threaded, so callbacks are `Rc` and the dispatcher
//! is a cheap `Rc<RefCell<_>>` handle.

use crate::stage::NodeId;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Interaction signals a node can receive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    PointerEnter,
    PointerLeave,
    PointerDown,
    PointerUp,
    TouchStart,
}

/// Context passed to listeners
#[derive(Clone, Debug)]
pub struct EventContext {
    /// The type of event that occurred
    pub event_type: EventType,
    /// The node that received the event
    pub node: NodeId,
}

/// Callback for handling events
pub type EventCallback = Rc<dyn Fn(&EventContext)>;

struct Listener {
    node: NodeId,
    event_type: EventType,
    callback: EventCallback,
}

#[derive(Default)]
struct DispatcherInner {
    listeners: SlotMap<ListenerId, Listener>,
}

/// Routes pointer events to the listeners registered on a node
#[derive(Clone, Default)]
pub struct EventDispatcher {
    inner: Rc<RefCell<DispatcherInner>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event_type` on `node`
    pub fn on<F>(&self, node: NodeId, event_type: EventType, callback: F) -> ListenerId
    where
        F: Fn(&EventContext) + 'static,
    {
        self.inner.borrow_mut().listeners.insert(Listener {
            node,
            event_type,
            callback: Rc::new(callback),
        })
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id).is_some()
    }

    /// Remove every listener registered on `node`
    pub fn remove_all_for(&self, node: NodeId) -> usize {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|_, l| l.node != node);
        before - inner.listeners.len()
    }

    /// Dispatch an event to `node`, returning how many listeners ran
    ///
    /// Callbacks are collected before any of them runs, so a listener may
    /// register or remove listeners (including itself) while handling.
    pub fn dispatch(&self, node: NodeId, event_type: EventType) -> usize {
        let callbacks: Vec<EventCallback> = self
            .inner
            .borrow()
            .listeners
            .values()
            .filter(|l| l.node == node && l.event_type == event_type)
            .map(|l| Rc::clone(&l.callback))
            .collect();

        let ctx = EventContext { event_type, node };
        for callback in &callbacks {
            callback(&ctx);
        }
        callbacks.len()
    }

    /// Total number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of listeners registered on a node
    pub fn listeners_on(&self, node: NodeId) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|l| l.node == node)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::stage::Stage;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_only_matching_type() {
        let stage = Stage::new();
        let node = stage.insert("button", Rect::ZERO);
        let dispatcher = EventDispatcher::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        dispatcher.on(node, EventType::PointerEnter, move |_| h.set(h.get() + 1));

        assert_eq!(dispatcher.dispatch(node, EventType::PointerLeave), 0);
        assert_eq!(dispatcher.dispatch(node, EventType::PointerEnter), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let stage = Stage::new();
        let node = stage.insert("button", Rect::ZERO);
        let dispatcher = EventDispatcher::new();

        let id = dispatcher.on(node, EventType::PointerDown, |_| {});
        assert_eq!(dispatcher.listener_count(), 1);
        assert!(dispatcher.remove(id));
        assert!(!dispatcher.remove(id));
        assert_eq!(dispatcher.dispatch(node, EventType::PointerDown), 0);
    }

    #[test]
    fn test_listener_can_remove_itself() {
        let stage = Stage::new();
        let node = stage.insert("button", Rect::ZERO);
        let dispatcher = EventDispatcher::new();
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let d = dispatcher.clone();
        let s = slot.clone();
        let id = dispatcher.on(node, EventType::TouchStart, move |_| {
            if let Some(id) = s.get() {
                d.remove(id);
            }
        });
        slot.set(Some(id));

        assert_eq!(dispatcher.dispatch(node, EventType::TouchStart), 1);
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_remove_all_for_node() {
        let stage = Stage::new();
        let a = stage.insert("a", Rect::ZERO);
        let b = stage.insert("b", Rect::ZERO);
        let dispatcher = EventDispatcher::new();
        dispatcher.on(a, EventType::PointerEnter, |_| {});
        dispatcher.on(a, EventType::PointerLeave, |_| {});
        dispatcher.on(b, EventType::PointerEnter, |_| {});

        assert_eq!(dispatcher.remove_all_for(a), 2);
        assert_eq!(dispatcher.listeners_on(b), 1);
    }
}
