//! Native backends. `NativeBackend` names the one for the current target.

#[cfg(windows)]
mod win32;
#[cfg(windows)]
pub use win32::Win32Backend;
#[cfg(windows)]
pub type NativeBackend = Win32Backend;

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
pub use unsupported::UnsupportedBackend;
#[cfg(not(windows))]
pub type NativeBackend = UnsupportedBackend;
