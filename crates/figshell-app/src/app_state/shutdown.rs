//! Orderly teardown before the event loop exits.

use std::time::Duration;

use super::core::ShellApp;

impl ShellApp {
    /// Close every tab before releasing the window.
    pub(super) fn shutdown(&mut self) {
        tracing::info!(tabs = self.tabs.len(), "Shutting down");

        self.tabs.close_all();
        self.surfaces = None;

        // Pending prompts are abandoned; their tabs are already gone.
        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(Duration::from_millis(500));
        }

        self.window = None;
        tracing::info!("Shutdown complete");
    }
}
