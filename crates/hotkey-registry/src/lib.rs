//! Global hotkey registration for a single message-loop thread.
//!
//! A [`HotkeyRegistry`] owns a hidden, message-only receiver window and every
//! hotkey registered against it. Hotkey messages the OS posts to that window
//! are decoded and re-published through [`HotkeyRegistry::on_key_pressed`].
//! Disposing (or dropping) the registry unregisters every hotkey before the
//! window is destroyed.

mod error;
pub mod event;
pub mod key;
pub mod platform;
pub mod receiver;
pub mod registry;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use event::{HotkeyPressed, Subscribers, SubscriptionId};
pub use key::{Key, KeyCode, ModifierSet};
pub use platform::NativeBackend;
pub use receiver::{Backend, HotkeyId, MessageSink, NativeReceiver, RawMessage};
pub use registry::{HotkeyRegistry, RegistryState};
