//! ShellApp struct definition and constructor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedReceiver;
use winit::window::Window;

use figshell_common::{CommandSender, ShellCommand, WindowId};
use figshell_config::ShellConfig;
use figshell_tab::webview::WrySurface;
use figshell_tab::{EventQueue, PermissionPrompt, SystemOpener};

use crate::dialogs::RfdPrompt;
use crate::manager::TabManager;

use super::surfaces::WrySurfaceFactory;

/// How often surface events and coordinator commands are drained.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// The shell opens a single window.
pub(super) const MAIN_WINDOW: WindowId = WindowId(1);

/// Top-level application state.
pub struct ShellApp {
    pub(super) config: ShellConfig,
    /// URL for the first tab, overriding `app.home_url`.
    pub(super) initial_url: Option<String>,

    // Tabs are declared before the window so their surfaces drop first.
    pub(super) tabs: TabManager<WrySurface>,
    pub(super) surfaces: Option<WrySurfaceFactory>,
    pub(super) window: Option<Arc<Window>>,

    // Surface callbacks -> event loop
    pub(super) events: EventQueue,
    // Tabs -> coordinator
    pub(super) commands: CommandSender,
    pub(super) command_rx: UnboundedReceiver<ShellCommand>,

    pub(super) prompt: Arc<dyn PermissionPrompt>,
    pub(super) tokio_runtime: Option<tokio::runtime::Runtime>,

    pub(super) modifiers: winit::keyboard::ModifiersState,
    pub(super) last_poll: Instant,
}

impl ShellApp {
    pub fn new(config: ShellConfig, initial_url: Option<String>) -> Self {
        let (commands, command_rx) = CommandSender::channel();
        let tabs = TabManager::new(
            MAIN_WINDOW,
            Arc::new(commands.clone()),
            Arc::new(SystemOpener),
            config.app.login_url.clone(),
        );

        Self {
            config,
            initial_url,
            tabs,
            surfaces: None,
            window: None,
            events: EventQueue::new(),
            commands,
            command_rx,
            prompt: Arc::new(RfdPrompt),
            tokio_runtime: None,
            modifiers: winit::keyboard::ModifiersState::empty(),
            last_poll: Instant::now(),
        }
    }

    /// URL the first tab opens.
    pub(super) fn start_url(&self) -> &str {
        self.initial_url
            .as_deref()
            .unwrap_or(self.config.app.home_url.as_str())
    }

    /// Mirror the active tab's title in the window title bar.
    pub(super) fn update_window_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = self
            .tabs
            .active_tab()
            .and_then(|tab| tab.title())
            .filter(|t| !t.is_empty())
            .unwrap_or("Figma");
        window.set_title(title);
    }
}
