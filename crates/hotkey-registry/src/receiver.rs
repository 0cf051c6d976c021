//! The native receiver: a message-only OS window that turns hotkey messages
//! into [`HotkeyPressed`] events.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::event::{HotkeyPressed, Subscribers, SubscriptionId};
use crate::key::{KeyCode, ModifierSet};

/// Message kind the OS posts when a registered hotkey fires
pub const WM_HOTKEY: u32 = 0x0312;

/// Identifier a hotkey is registered under, scoped to one receiver window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotkeyId(pub(crate) i32);

impl HotkeyId {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for HotkeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A window message as the window procedure received it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub kind: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub fn new(kind: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            kind,
            wparam,
            lparam,
        }
    }

    /// A hotkey message as the OS would post it for `id`
    pub fn hotkey(id: HotkeyId, modifiers: ModifierSet, key: KeyCode) -> Self {
        let lparam = ((key.raw() as isize) << 16) | modifiers.bits() as isize;
        Self::new(WM_HOTKEY, id.0 as usize, lparam)
    }

    /// Decode a hotkey message. Any other kind yields `None`.
    ///
    /// The key code sits in the upper 16 bits of `lparam`, the modifiers in
    /// the lower 16.
    pub fn decode_hotkey(&self) -> Option<HotkeyPressed> {
        if self.kind != WM_HOTKEY {
            return None;
        }
        let key = KeyCode::from_raw(((self.lparam >> 16) & 0xFFFF) as u16);
        let modifiers = ModifierSet::from_raw((self.lparam & 0xFFFF) as u32);
        Some(HotkeyPressed { key, modifiers })
    }
}

/// The OS surface the receiver and registry drive.
///
/// All methods are called from the thread that created the receiver.
pub trait Backend {
    /// Native window handle
    type Handle: Copy + fmt::Debug;

    /// Create a message-only window whose messages are forwarded to `sink`
    fn create_receiver(&self, sink: Rc<MessageSink>) -> Result<Self::Handle>;

    /// Release a window created by `create_receiver`
    fn destroy_receiver(&self, handle: Self::Handle);

    fn register_hotkey(
        &self,
        handle: Self::Handle,
        id: HotkeyId,
        modifiers: ModifierSet,
        key: KeyCode,
    ) -> Result<()>;

    fn unregister_hotkey(&self, handle: Self::Handle, id: HotkeyId) -> Result<()>;
}

/// Decoding half of the receiver, shared with the window procedure
pub struct MessageSink {
    open: Cell<bool>,
    pressed: Subscribers<HotkeyPressed>,
}

impl Default for MessageSink {
    fn default() -> Self {
        Self {
            open: Cell::new(true),
            pressed: Subscribers::new(),
        }
    }
}

impl MessageSink {
    /// Handle one inbound message, after default processing has already run.
    ///
    /// Returns true if a `HotkeyPressed` event was emitted.
    pub fn on_message(&self, msg: RawMessage) -> bool {
        if !self.open.get() {
            trace!(kind = msg.kind, "message for closed receiver dropped");
            return false;
        }
        let Some(event) = msg.decode_hotkey() else {
            return false;
        };
        debug!(id = msg.wparam, key = %event.key, "hotkey message received");
        self.pressed.emit(&event);
        true
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    fn close(&self) {
        self.open.set(false);
        self.pressed.clear();
    }
}

/// Owns one message-only window for its whole lifetime
pub struct NativeReceiver<B: Backend> {
    handle: Option<B::Handle>,
    sink: Rc<MessageSink>,
}

impl<B: Backend> NativeReceiver<B> {
    /// Create the receiver window. Failure is returned as-is, never retried.
    pub fn create(backend: &B) -> Result<Self> {
        let sink = Rc::new(MessageSink::default());
        let handle = backend.create_receiver(sink.clone())?;
        debug!(?handle, "hotkey receiver created");
        Ok(Self {
            handle: Some(handle),
            sink,
        })
    }

    /// The live window handle, or `None` once destroyed
    pub fn handle(&self) -> Option<B::Handle> {
        self.handle
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&HotkeyPressed) + 'static,
    {
        self.sink.pressed.subscribe(handler)
    }

    /// Stop emitting and release the window. Later calls do nothing.
    pub fn destroy(&mut self, backend: &B) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.sink.close();
        backend.destroy_receiver(handle);
        debug!(?handle, "hotkey receiver destroyed");
    }
}
