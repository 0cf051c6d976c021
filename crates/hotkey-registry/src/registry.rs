use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::event::{HotkeyPressed, Subscribers, SubscriptionId};
use crate::key::{Key, KeyCode, ModifierSet};
use crate::platform::NativeBackend;
use crate::receiver::{Backend, HotkeyId, NativeReceiver};

/// Lifecycle of a [`HotkeyRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Receiver window is live and `register` is accepted
    Active,
    /// Every hotkey has been unregistered and the receiver destroyed
    Disposed,
}

/// Owns a receiver window and every global hotkey registered against it.
///
/// Hotkey ids are allocated from 1 upwards and never reused. Dropping the
/// registry disposes it, so every allocated id is unregistered before the
/// receiver window goes away.
///
/// The registry is bound to the thread that created it; hotkey messages are
/// delivered to that thread's message loop.
pub struct HotkeyRegistry<B: Backend = NativeBackend> {
    backend: B,
    receiver: NativeReceiver<B>,
    pressed: Rc<Subscribers<HotkeyPressed>>,
    last_id: i32,
    ignored: Vec<HotkeyId>,
    state: RegistryState,
}

impl HotkeyRegistry<NativeBackend> {
    /// Creates a registry backed by the platform's native hotkey API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReceiverCreation`] if the receiver window cannot be
    /// created, or on platforms without a native backend.
    pub fn new() -> Result<Self> {
        Self::with_backend(NativeBackend::default())
    }
}

impl<B: Backend> HotkeyRegistry<B> {
    /// Creates a registry on top of an explicit backend.
    pub fn with_backend(backend: B) -> Result<Self> {
        let receiver = NativeReceiver::create(&backend)?;

        let pressed = Rc::new(Subscribers::new());
        let forward = pressed.clone();
        receiver.subscribe(move |event: &HotkeyPressed| {
            forward.emit(event);
        });

        info!("Hotkey registry created");
        Ok(Self {
            backend,
            receiver,
            pressed,
            last_id: 0,
            ignored: Vec::new(),
            state: RegistryState::Active,
        })
    }

    /// Registers a global hotkey.
    ///
    /// A fresh id is allocated for every call, even when the OS refuses the
    /// combination. A refusal is not an error: it is logged and reported as
    /// `Ok(false)`, and the id is still unregistered on dispose.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the registry has been disposed.
    pub fn register(&mut self, modifiers: ModifierSet, key: KeyCode) -> Result<bool> {
        let handle = match (self.state, self.receiver.handle()) {
            (RegistryState::Active, Some(handle)) => handle,
            _ => return Err(Error::Disposed),
        };

        self.last_id += 1;
        let id = HotkeyId(self.last_id);
        let combo = Key::new(modifiers, key);

        match self.backend.register_hotkey(handle, id, modifiers, key) {
            Ok(()) => {
                debug!(%id, %combo, "hotkey registered");
                Ok(true)
            }
            Err(e) => {
                warn!(%id, %combo, "hotkey registration ignored: {}", e);
                self.ignored.push(id);
                Ok(false)
            }
        }
    }

    /// Registers a parsed key combination.
    pub fn register_key(&mut self, key: &Key) -> Result<bool> {
        self.register(key.modifiers, key.code)
    }

    /// Registers a hotkey from a string such as `"ctrl+shift+enter"`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hotkey_registry::HotkeyRegistry;
    ///
    /// let mut registry = HotkeyRegistry::new().unwrap();
    /// registry.register_str("ctrl+shift+enter").unwrap();
    /// ```
    pub fn register_str(&mut self, key_str: &str) -> Result<bool> {
        let key = Key::parse(key_str)?;
        self.register_key(&key)
    }

    /// Subscribes to the key-pressed event.
    ///
    /// Handlers run synchronously on the message-loop thread, once per
    /// hotkey message, in subscription order.
    pub fn on_key_pressed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&HotkeyPressed) + 'static,
    {
        self.pressed.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.pressed.unsubscribe(id)
    }

    /// Unregisters every allocated id, newest first, then destroys the receiver.
    ///
    /// Unregister failures are expected for ids the OS refused and are only
    /// logged. Calling this more than once does nothing.
    pub fn dispose(&mut self) {
        if self.state == RegistryState::Disposed {
            return;
        }
        self.state = RegistryState::Disposed;

        if let Some(handle) = self.receiver.handle() {
            for raw in (1..=self.last_id).rev() {
                let id = HotkeyId(raw);
                if let Err(e) = self.backend.unregister_hotkey(handle, id) {
                    debug!(%id, "unregister was a no-op: {}", e);
                }
            }
        }

        self.receiver.destroy(&self.backend);
        self.pressed.clear();
        info!(allocated = self.last_id, "Hotkey registry disposed");
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RegistryState::Active
    }

    /// Number of ids allocated so far, an upper bound on live registrations
    pub fn allocated(&self) -> usize {
        self.last_id as usize
    }

    /// Number of registrations the OS refused
    pub fn ignored(&self) -> usize {
        self.ignored.len()
    }
}

impl<B: Backend> Drop for HotkeyRegistry<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
