//! In-memory backend that records every native call.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::key::{KeyCode, ModifierSet};
use crate::receiver::{Backend, HotkeyId, MessageSink, RawMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Create(u32),
    Destroy(u32),
    Register(u32, HotkeyId, ModifierSet, KeyCode),
    Unregister(u32, HotkeyId),
}

#[derive(Default)]
struct Inner {
    next_handle: u32,
    refuse_create: bool,
    refused: HashSet<(ModifierSet, KeyCode)>,
    calls: Vec<Call>,
    sinks: HashMap<u32, Rc<MessageSink>>,
    live_windows: HashSet<u32>,
    table: HashMap<(u32, HotkeyId), (ModifierSet, KeyCode)>,
}

/// Clones share state, so a test can keep one while the registry owns another
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: Rc<RefCell<Inner>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every `create_receiver` call
    pub fn refuse_create(self) -> Self {
        self.inner.borrow_mut().refuse_create = true;
        self
    }

    /// Fail registration of this combination, as if another process owned it
    pub fn refuse(self, modifiers: ModifierSet, key: KeyCode) -> Self {
        self.inner.borrow_mut().refused.insert((modifiers, key));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn registered_ids(&self) -> Vec<HotkeyId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Register(_, id, _, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn unregistered_ids(&self) -> Vec<HotkeyId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Unregister(_, id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Number of entries currently held in the simulated OS hotkey table
    pub fn live_registrations(&self) -> usize {
        self.inner.borrow().table.len()
    }

    /// Deliver a message to a live window, as the message pump would
    pub fn deliver(&self, handle: u32, msg: RawMessage) -> bool {
        let sink = {
            let inner = self.inner.borrow();
            if !inner.live_windows.contains(&handle) {
                return false;
            }
            inner.sinks.get(&handle).cloned()
        };
        sink.is_some_and(|sink| sink.on_message(msg))
    }

    /// Deliver a message even if the window has already been destroyed
    pub fn deliver_stale(&self, handle: u32, msg: RawMessage) -> bool {
        let sink = self.inner.borrow().sinks.get(&handle).cloned();
        sink.is_some_and(|sink| sink.on_message(msg))
    }

    /// Simulate the user pressing a combination. Only fires if the table
    /// holds a registration for it.
    pub fn press(&self, modifiers: ModifierSet, key: KeyCode) -> bool {
        let target = self
            .inner
            .borrow()
            .table
            .iter()
            .find(|(_, combo)| **combo == (modifiers, key))
            .map(|((handle, id), _)| (*handle, *id));
        match target {
            Some((handle, id)) => self.deliver(handle, RawMessage::hotkey(id, modifiers, key)),
            None => false,
        }
    }
}

impl Backend for RecordingBackend {
    type Handle = u32;

    fn create_receiver(&self, sink: Rc<MessageSink>) -> Result<u32> {
        let mut inner = self.inner.borrow_mut();
        if inner.refuse_create {
            return Err(Error::ReceiverCreation("window creation refused".to_string()));
        }
        inner.next_handle += 1;
        let handle = inner.next_handle;
        inner.sinks.insert(handle, sink);
        inner.live_windows.insert(handle);
        inner.calls.push(Call::Create(handle));
        Ok(handle)
    }

    fn destroy_receiver(&self, handle: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.live_windows.remove(&handle);
        inner.table.retain(|(h, _), _| *h != handle);
        inner.calls.push(Call::Destroy(handle));
    }

    fn register_hotkey(
        &self,
        handle: u32,
        id: HotkeyId,
        modifiers: ModifierSet,
        key: KeyCode,
    ) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::Register(handle, id, modifiers, key));
        let taken = inner.table.values().any(|combo| *combo == (modifiers, key));
        if taken || inner.refused.contains(&(modifiers, key)) {
            return Err(Error::HotkeyOperation("hot key is already registered".to_string()));
        }
        inner.table.insert((handle, id), (modifiers, key));
        Ok(())
    }

    fn unregister_hotkey(&self, handle: u32, id: HotkeyId) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::Unregister(handle, id));
        match inner.table.remove(&(handle, id)) {
            Some(_) => Ok(()),
            None => Err(Error::HotkeyOperation("hot key is not registered".to_string())),
        }
    }
}
