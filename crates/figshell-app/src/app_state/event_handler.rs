//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::WindowId;

use super::core::ShellApp;
use super::surfaces::content_rect;

/// Window-level shortcuts. Most key presses go to the focused webview and
/// never reach winit; these cover the window chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Shortcut {
    NewTab,
    CloseTab,
    NextTab,
    Reload,
    ToggleDevtools,
}

impl Shortcut {
    pub(super) fn from_key(key: &Key, modifiers: ModifiersState) -> Option<Self> {
        let primary = if cfg!(target_os = "macos") {
            modifiers.super_key()
        } else {
            modifiers.control_key()
        };

        match key {
            Key::Named(NamedKey::F12) => Some(Self::ToggleDevtools),
            Key::Named(NamedKey::Tab) if modifiers.control_key() => Some(Self::NextTab),
            Key::Character(c) if primary => {
                match (c.to_ascii_lowercase().as_str(), modifiers.shift_key()) {
                    ("t", false) => Some(Self::NewTab),
                    ("w", false) => Some(Self::CloseTab),
                    ("r", false) => Some(Self::Reload),
                    ("i", true) => Some(Self::ToggleDevtools),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl ShellApp {
    fn handle_keyboard_input(&mut self, event: KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let Some(shortcut) = Shortcut::from_key(&event.logical_key, self.modifiers) else {
            return;
        };
        tracing::debug!(?shortcut, "shortcut");

        match shortcut {
            Shortcut::NewTab => {
                let url = self.config.app.home_url.clone();
                if let Some(surfaces) = self.surfaces.as_mut() {
                    if let Err(e) = self.tabs.open_tab(surfaces, &url) {
                        tracing::warn!(url = %url, "Failed to open tab: {e}");
                    }
                }
            }
            Shortcut::CloseTab => {
                if let Some(id) = self.tabs.active() {
                    self.tabs.close_tab(id);
                }
                if self.tabs.is_empty() {
                    self.shutdown();
                    event_loop.exit();
                    return;
                }
            }
            Shortcut::NextTab => self.tabs.select_next(),
            Shortcut::Reload => self.tabs.reload_active(),
            Shortcut::ToggleDevtools => self.tabs.toggle_active_devtools(),
        }
        self.update_window_title();
    }
}

impl ApplicationHandler for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(window) = &self.window {
                        let bounds = content_rect(window);
                        self.tabs.resize(bounds);
                    }
                }
            }

            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_keyboard_input(event, event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_and_schedule(event_loop);
    }
}
