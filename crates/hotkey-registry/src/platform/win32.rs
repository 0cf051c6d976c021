use std::rc::Rc;

use tracing::{trace, warn};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    HOT_KEY_MODIFIERS, RegisterHotKey, UnregisterHotKey,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GWLP_USERDATA, GetWindowLongPtrW,
    HWND_MESSAGE, RegisterClassW, SetWindowLongPtrW, WINDOW_EX_STYLE, WINDOW_STYLE, WNDCLASSW,
};
use windows::core::{PCWSTR, w};

use crate::error::{Error, Result};
use crate::key::{KeyCode, ModifierSet};
use crate::receiver::{Backend, HotkeyId, MessageSink, RawMessage};

const CLASS_NAME: PCWSTR = w!("HotkeyRegistryReceiver");

/// Win32 backend: a message-only window plus `RegisterHotKey`/`UnregisterHotKey`.
///
/// The window's `GWLP_USERDATA` slot holds a strong `Rc<MessageSink>` from
/// creation until `destroy_receiver`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Backend;

impl Backend for Win32Backend {
    type Handle = HWND;

    fn create_receiver(&self, sink: Rc<MessageSink>) -> Result<HWND> {
        let instance = unsafe { GetModuleHandleW(None) }
            .map_err(|e| Error::ReceiverCreation(e.to_string()))?;

        let class = WNDCLASSW {
            lpfnWndProc: Some(receiver_proc),
            hInstance: instance.into(),
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };
        // Fails harmlessly once the class exists.
        let _ = unsafe { RegisterClassW(&class) };

        // SAFETY: the class was registered above; HWND_MESSAGE makes the window
        // message-only, with no surface and no visible parent.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                CLASS_NAME,
                PCWSTR::null(),
                WINDOW_STYLE::default(),
                0,
                0,
                0,
                0,
                Some(HWND_MESSAGE),
                None,
                Some(instance.into()),
                None,
            )
        }
        .map_err(|e| Error::ReceiverCreation(e.to_string()))?;

        let raw = Rc::into_raw(sink);
        // SAFETY: hwnd was just created on this thread.
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, raw as isize) };
        Ok(hwnd)
    }

    fn destroy_receiver(&self, hwnd: HWND) {
        // SAFETY: hwnd is live until DestroyWindow below; the slot was filled
        // by create_receiver with Rc::into_raw.
        let raw = unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) } as *const MessageSink;
        if let Err(e) = unsafe { DestroyWindow(hwnd) } {
            warn!(?hwnd, "DestroyWindow failed: {}", e);
        }
        if !raw.is_null() {
            drop(unsafe { Rc::from_raw(raw) });
        }
    }

    fn register_hotkey(
        &self,
        hwnd: HWND,
        id: HotkeyId,
        modifiers: ModifierSet,
        key: KeyCode,
    ) -> Result<()> {
        // SAFETY: RegisterHotKey is an OS API; hwnd is a live receiver window.
        unsafe {
            RegisterHotKey(
                Some(hwnd),
                id.get(),
                HOT_KEY_MODIFIERS(modifiers.bits()),
                u32::from(key.raw()),
            )
        }?;
        Ok(())
    }

    fn unregister_hotkey(&self, hwnd: HWND, id: HotkeyId) -> Result<()> {
        // SAFETY: UnregisterHotKey is an OS API.
        unsafe { UnregisterHotKey(Some(hwnd), id.get()) }?;
        Ok(())
    }
}

unsafe extern "system" fn receiver_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let result = unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };

    let raw = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const MessageSink;
    if raw.is_null() {
        return result;
    }

    // Hold our own reference: a handler may dispose the registry, which
    // releases the window's reference while we are still dispatching.
    let sink = unsafe {
        Rc::increment_strong_count(raw);
        Rc::from_raw(raw)
    };
    if sink.on_message(RawMessage::new(msg, wparam.0, lparam.0)) {
        trace!(?hwnd, "hotkey dispatched");
    }
    result
}
