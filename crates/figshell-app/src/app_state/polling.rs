//! Draining surface events and coordinator commands on the UI thread.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::error::TryRecvError;
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use figshell_common::ShellCommand;

use crate::manager::PendingPrompt;

use super::core::{ShellApp, POLL_INTERVAL};

impl ShellApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_tab_events();
            self.poll_commands();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// Apply queued page-load, title, and IPC events.
    fn poll_tab_events(&mut self) {
        let events = self.events.drain();
        if events.is_empty() {
            return;
        }

        for event in events {
            for pending in self.tabs.handle_event(event) {
                self.show_prompt(pending);
            }
        }
        self.update_window_title();
    }

    /// Carry out commands the tabs sent through the coordinator.
    fn poll_commands(&mut self) {
        loop {
            let command = match self.command_rx.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Command channel closed");
                    break;
                }
            };

            match self.surfaces.as_mut() {
                Some(surfaces) => self.tabs.handle_command(command, surfaces),
                None => tracing::debug!(?command, "No window yet, command dropped"),
            }
        }
        self.update_window_title();
    }

    /// Ask the user on the runtime; the answer comes back as a command.
    fn show_prompt(&mut self, pending: PendingPrompt) {
        let prompt = Arc::clone(&self.prompt);
        let commands = self.commands.clone();
        let PendingPrompt { tab_id, request } = pending;

        let Some(rt) = self.runtime() else {
            self.commands.send(ShellCommand::PermissionAnswered {
                tab_id,
                granted: false,
            });
            return;
        };

        rt.spawn(async move {
            let granted = prompt.confirm(&request).await;
            commands.send(ShellCommand::PermissionAnswered { tab_id, granted });
        });
    }

    /// Handle to the runtime prompts run on, created on first use.
    fn runtime(&mut self) -> Option<tokio::runtime::Handle> {
        if self.tokio_runtime.is_none() {
            let built = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("figshell-prompt")
                .enable_all()
                .build();
            match built {
                Ok(rt) => self.tokio_runtime = Some(rt),
                Err(e) => {
                    tracing::error!("Failed to create tokio runtime, denying prompt: {e}");
                    return None;
                }
            }
        }
        self.tokio_runtime.as_ref().map(|rt| rt.handle().clone())
    }
}
