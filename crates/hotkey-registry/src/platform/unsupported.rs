use std::rc::Rc;

use crate::error::{Error, Result};
use crate::key::{KeyCode, ModifierSet};
use crate::receiver::{Backend, HotkeyId, MessageSink};

/// Backend for targets without a message-only window API.
///
/// Receiver creation always fails, so a registry can never become active.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBackend;

impl Backend for UnsupportedBackend {
    type Handle = ();

    fn create_receiver(&self, _sink: Rc<MessageSink>) -> Result<()> {
        Err(Error::ReceiverCreation(format!(
            "global hotkeys are not supported on {}",
            std::env::consts::OS
        )))
    }

    fn destroy_receiver(&self, _handle: ()) {}

    fn register_hotkey(
        &self,
        _handle: (),
        _id: HotkeyId,
        _modifiers: ModifierSet,
        _key: KeyCode,
    ) -> Result<()> {
        Err(Error::HotkeyOperation("no native hotkey backend".to_string()))
    }

    fn unregister_hotkey(&self, _handle: (), _id: HotkeyId) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, HotkeyRegistry};

    #[test]
    fn test_new_reports_receiver_creation_failure() {
        let err = HotkeyRegistry::new().err().unwrap();
        assert!(matches!(err, Error::ReceiverCreation(_)));
        assert!(err.to_string().contains(std::env::consts::OS));
    }
}
