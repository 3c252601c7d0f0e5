//! Commands a tab sends to the coordinator that owns all tabs.
//!
//! Tabs never broadcast process-wide. They hold a [`Coordinator`] handed to
//! them at construction and push typed [`ShellCommand`]s through it.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::{TabId, WindowId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ShellCommand {
    /// A tab needs its bounds laid out inside the given window.
    RequestBounds(WindowId),
    /// The user navigated to the logout page; every tab must sign out.
    SignOut,
    /// Open the URL in a fresh tab.
    OpenUrlInNewTab(String),
    /// The answer to a permission prompt for a tab.
    PermissionAnswered { tab_id: TabId, granted: bool },
}

/// The narrow capability a tab uses to reach the rest of the application.
pub trait Coordinator: Send + Sync {
    fn notify_sign_out(&self);
    fn notify_open_in_new_tab(&self, url: &str);
    fn request_bounds(&self, window_id: WindowId);
}

/// [`Coordinator`] backed by an unbounded channel drained by the tab manager.
#[derive(Debug, Clone)]
pub struct CommandSender {
    sender: mpsc::UnboundedSender<ShellCommand>,
}

impl CommandSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ShellCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Send a command. Returns `false` if the receiving side is gone.
    pub fn send(&self, command: ShellCommand) -> bool {
        match self.sender.send(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(command = ?e.0, "coordinator gone, command dropped");
                false
            }
        }
    }
}

impl Coordinator for CommandSender {
    fn notify_sign_out(&self) {
        self.send(ShellCommand::SignOut);
    }

    fn notify_open_in_new_tab(&self, url: &str) {
        self.send(ShellCommand::OpenUrlInNewTab(url.to_string()));
    }

    fn request_bounds(&self, window_id: WindowId) {
        self.send(ShellCommand::RequestBounds(window_id));
    }
}
