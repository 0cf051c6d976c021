use thiserror::Error;

/// The main error type for hotkey-registry operations
#[derive(Error, Debug)]
pub enum Error {
    /// The OS refused to create the message-only receiver window
    #[error("Failed to create hotkey receiver: {0}")]
    ReceiverCreation(String),

    /// The registry was used after `dispose()`
    #[error("Hotkey registry has been disposed")]
    Disposed,

    /// Error parsing or validating a key combination
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A native register or unregister call failed
    #[error("Hotkey error: {0}")]
    HotkeyOperation(String),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(windows)]
impl From<windows::core::Error> for Error {
    fn from(err: windows::core::Error) -> Self {
        Error::HotkeyOperation(err.to_string())
    }
}
