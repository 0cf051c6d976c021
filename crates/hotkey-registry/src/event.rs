//! Synchronous observer lists.
//!
//! Everything here runs on the thread that owns the message loop, so handlers
//! are plain `Rc<dyn Fn>` and delivery happens inline in `emit`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::key::{Key, KeyCode, ModifierSet};

/// Emitted once for every hotkey message the receiver decodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyPressed {
    /// The primary key of the combination that fired
    pub key: KeyCode,
    /// The modifiers reported alongside the key
    pub modifiers: ModifierSet,
}

impl HotkeyPressed {
    /// The full combination that fired
    pub fn combination(&self) -> Key {
        Key::new(self.modifiers, self.key)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Rc<dyn Fn(&T)>;

/// A list of handlers that all receive every emitted value, in subscription order
pub struct Subscribers<T> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Handler<T>)>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(1),
            handlers: RefCell::new(Vec::new()),
        }
    }
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler; it sees every value emitted from now on
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    /// Deliver `value` to every current handler and return how many were called.
    ///
    /// The handler list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while running; changes apply to the next emit.
    pub fn emit(&self, value: &T) -> usize {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in &snapshot {
            handler(value);
        }
        snapshot.len()
    }

    /// Drop every handler
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
