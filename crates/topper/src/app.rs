use std::thread;

use anyhow::{Context, Result};
use hotkey_registry::{HotkeyPressed, HotkeyRegistry};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use tao::window::{Window, WindowBuilder};
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;

#[derive(Debug, Clone, Copy)]
pub enum UserEvent {
    Hotkey(HotkeyPressed),
    Shutdown,
}

/// Whether the main window is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Shown => Visibility::Hidden,
            Visibility::Hidden => Visibility::Shown,
        }
    }

    fn apply(self, window: &Window) {
        match self {
            Visibility::Shown => {
                window.set_visible(true);
                window.set_focus();
            }
            Visibility::Hidden => window.set_visible(false),
        }
    }
}

/// Create the registry and bind every configured hotkey.
///
/// Returns `None` if the receiver cannot be created; the app keeps running
/// without hotkeys in that case.
fn start_hotkeys(config: &Config, proxy: EventLoopProxy<UserEvent>) -> Option<HotkeyRegistry> {
    let mut registry = match HotkeyRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            error!("Global hotkeys unavailable: {}", e);
            return None;
        }
    };

    registry.on_key_pressed(move |pressed| {
        if proxy.send_event(UserEvent::Hotkey(*pressed)).is_err() {
            debug!("Event loop closed, dropping hotkey press");
        }
    });

    for key in &config.hotkeys {
        match registry.register_key(key) {
            Ok(true) => info!("Bound {}", key),
            Ok(false) => warn!("{} is already in use, not bound", key),
            Err(e) => error!("Failed to bind {}: {}", key, e),
        }
    }
    Some(registry)
}

/// Ask the event loop to exit on Ctrl+C
fn spawn_ctrl_c_listener(proxy: EventLoopProxy<UserEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime: {}", e);
                return;
            }
        };
        runtime.block_on(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            info!("Received Ctrl+C, shutting down...");
            let _ = proxy.send_event(UserEvent::Shutdown);
        });
    });
}

/// Run the app until the window is closed or Ctrl+C is pressed.
///
/// The tao loop pumps this thread's messages, which is what delivers hotkey
/// messages to the registry's receiver window.
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_visible(false)
        .build(&event_loop)
        .context("Failed to create main window")?;

    let mut visibility = if config.start_visible {
        Visibility::Shown
    } else {
        Visibility::Hidden
    };
    visibility.apply(&window);

    let mut registry = start_hotkeys(&config, event_loop.create_proxy());
    spawn_ctrl_c_listener(event_loop.create_proxy());

    info!("Starting event loop");
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(UserEvent::Hotkey(pressed)) => {
                visibility = visibility.toggled();
                debug!("{} pressed, window now {:?}", pressed.combination(), visibility);
                visibility.apply(&window);
            }
            Event::UserEvent(UserEvent::Shutdown)
            | Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }
            Event::LoopDestroyed => {
                if let Some(mut registry) = registry.take() {
                    registry.dispose();
                }
                info!("Event loop destroyed");
            }
            Event::NewEvents(_) | Event::MainEventsCleared | Event::RedrawEventsCleared => {}
            _ => trace!("Event loop received: {:?}", event),
        }
    })
}
