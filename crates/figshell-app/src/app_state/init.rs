//! Window creation and the first tab.

use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use super::core::ShellApp;
use super::surfaces::{content_rect, WrySurfaceFactory};

impl ShellApp {
    /// Create the window and open the first tab.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title("Figma")
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640.0, 480.0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let mut surfaces =
            WrySurfaceFactory::new(Arc::clone(&window), self.events.clone(), self.config.clone());
        self.tabs.resize(content_rect(&window));

        let url = self.start_url().to_string();
        if let Err(e) = self.tabs.open_tab(&mut surfaces, &url) {
            tracing::error!(url = %url, "Failed to open first tab: {e}");
            return false;
        }

        self.surfaces = Some(surfaces);
        self.window = Some(window);
        tracing::info!(url = %url, "Window ready");
        true
    }
}
