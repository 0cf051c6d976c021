//! Registers ctrl+shift+enter and prints each press until the process is killed.
//!
//! The registry needs a message loop on the thread that created it; this
//! example pumps one with `GetMessageW` on Windows.

use hotkey_registry::HotkeyRegistry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut registry = HotkeyRegistry::new()?;
    registry.on_key_pressed(|pressed| println!("pressed: {}", pressed.combination()));
    if !registry.register_str("ctrl+shift+enter")? {
        eprintln!("ctrl+shift+enter is taken by another application");
    }

    pump_messages();
    registry.dispose();
    Ok(())
}

#[cfg(windows)]
fn pump_messages() {
    use windows::Win32::UI::WindowsAndMessaging::{DispatchMessageW, GetMessageW, MSG};

    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.as_bool() {
        unsafe { DispatchMessageW(&msg) };
    }
}

#[cfg(not(windows))]
fn pump_messages() {}
