//! Owns every tab in a window and carries out coordinator commands.
//!
//! Tabs reach the manager only through [`ShellCommand`]s and [`TabEvent`]s;
//! the manager is the sole owner of tab state.

use std::collections::HashMap;
use std::sync::Arc;

use figshell_common::{Coordinator, Rect, ShellCommand, ShellError, TabId, WindowId};
use figshell_tab::url_rules::{is_figma_url, is_logout_page};
use figshell_tab::{
    ContentSurface, ExternalOpener, Gatekeeper, PageLoadState, PromptRequest, Tab, TabEvent,
    TabMessage,
};
use tracing::{debug, info, warn};


/// Creates the content surface behind each new tab.
pub trait SurfaceFactory {
    type Surface: ContentSurface;

    /// Reserve the id for the next surface.
    fn next_id(&mut self) -> TabId;

    fn create(
        &mut self,
        id: TabId,
        url: &str,
        gatekeeper: Gatekeeper,
    ) -> Result<Self::Surface, ShellError>;
}

/// A prompt a tab is waiting on. The answer comes back as
/// [`ShellCommand::PermissionAnswered`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPrompt {
    pub tab_id: TabId,
    pub request: PromptRequest,
}

pub struct TabManager<S: ContentSurface> {
    window_id: WindowId,
    tabs: HashMap<TabId, Tab<S>>,
    /// Tab strip order.
    order: Vec<TabId>,
    active: Option<TabId>,
    content_bounds: Rect,
    coordinator: Arc<dyn Coordinator>,
    opener: Arc<dyn ExternalOpener>,
    login_url: String,
}

impl<S: ContentSurface> TabManager<S> {
    pub fn new(
        window_id: WindowId,
        coordinator: Arc<dyn Coordinator>,
        opener: Arc<dyn ExternalOpener>,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            window_id,
            tabs: HashMap::new(),
            order: Vec::new(),
            active: None,
            content_bounds: Rect::default(),
            coordinator,
            opener,
            login_url: login_url.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tab ids in strip order.
    pub fn ids(&self) -> &[TabId] {
        &self.order
    }

    pub fn active(&self) -> Option<TabId> {
        self.active
    }

    pub fn get(&self, id: TabId) -> Option<&Tab<S>> {
        self.tabs.get(&id)
    }

    pub fn active_tab(&self) -> Option<&Tab<S>> {
        self.active.and_then(|id| self.tabs.get(&id))
    }

    // -- tab lifecycle --

    /// Create a tab showing `url` and select it.
    pub fn open_tab<F>(&mut self, factory: &mut F, url: &str) -> Result<TabId, ShellError>
    where
        F: SurfaceFactory<Surface = S>,
    {
        let id = factory.next_id();
        let gatekeeper = Gatekeeper::new(
            id,
            Arc::clone(&self.coordinator),
            Arc::clone(&self.opener),
        );
        let surface = factory.create(id, url, gatekeeper.clone())?;

        self.tabs
            .insert(id, Tab::new(self.window_id, surface, gatekeeper));
        self.order.push(id);
        self.select(id);
        info!(tab_id = %id, url, "tab opened");
        Ok(id)
    }

    /// Close a tab, dropping its surface. Returns `false` for unknown ids.
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let Some(index) = self.order.iter().position(|t| *t == id) else {
            return false;
        };
        self.order.remove(index);
        self.tabs.remove(&id);
        info!(tab_id = %id, remaining = self.order.len(), "tab closed");

        if self.active == Some(id) {
            self.active = None;
            let neighbour = self
                .order
                .get(index)
                .or_else(|| self.order.last())
                .copied();
            if let Some(next) = neighbour {
                self.select(next);
            }
        }
        true
    }

    /// Drop every tab, newest first.
    pub fn close_all(&mut self) {
        while let Some(id) = self.order.last().copied() {
            self.close_tab(id);
        }
    }

    /// Make `id` the visible tab. Returns `false` for unknown ids.
    pub fn select(&mut self, id: TabId) -> bool {
        if !self.tabs.contains_key(&id) {
            return false;
        }
        self.active = Some(id);
        for (tab_id, tab) in &self.tabs {
            if let Err(e) = tab.surface().set_visible(*tab_id == id) {
                warn!(tab_id = %tab_id, error = %e, "failed to change visibility");
            }
        }
        debug!(tab_id = %id, "tab selected");
        true
    }

    /// Select the tab after the active one, wrapping around.
    pub fn select_next(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        if let Some(index) = self.order.iter().position(|t| *t == active) {
            let next = self.order[(index + 1) % self.order.len()];
            self.select(next);
        }
    }

    pub fn reload_active(&self) {
        if let Some(tab) = self.active_tab() {
            tab.reload();
        }
    }

    pub fn toggle_active_devtools(&self) {
        if let Some(tab) = self.active_tab() {
            tab.toggle_devtools();
        }
    }

    // -- layout --

    /// Record the window's content area and resize tabs that follow it.
    pub fn resize(&mut self, bounds: Rect) {
        self.content_bounds = bounds;
        self.layout();
    }

    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    fn layout(&self) {
        for tab in self.tabs.values() {
            if tab.surface().auto_resize() {
                tab.set_bounds(self.content_bounds);
            }
        }
    }

    // -- coordinator commands --

    pub fn handle_command<F>(&mut self, command: ShellCommand, factory: &mut F)
    where
        F: SurfaceFactory<Surface = S>,
    {
        debug!(?command, "coordinator command");
        match command {
            ShellCommand::RequestBounds(window_id) => {
                if window_id == self.window_id {
                    self.layout();
                } else {
                    debug!(%window_id, "bounds requested for another window");
                }
            }
            ShellCommand::SignOut => self.sign_out(),
            ShellCommand::OpenUrlInNewTab(url) => self.open_in_new_tab(factory, &url),
            ShellCommand::PermissionAnswered { tab_id, granted } => {
                match self.tabs.get_mut(&tab_id) {
                    Some(tab) => tab.resolve_permission_prompt(granted),
                    None => debug!(%tab_id, granted, "answer for a closed tab dropped"),
                }
            }
        }
    }

    /// Send every tab back to the login page. Tabs still on the logout page
    /// are left to finish it.
    pub fn sign_out(&mut self) {
        info!(tabs = self.order.len(), "signing out");
        for id in &self.order {
            let Some(tab) = self.tabs.get_mut(id) else {
                continue;
            };
            if tab.surface().url().is_some_and(|url| is_logout_page(&url)) {
                continue;
            }
            if let Err(e) = tab.load_url(&self.login_url) {
                warn!(tab_id = %id, error = %e, "failed to load login page");
            }
        }
    }

    /// Open Figma URLs in a new tab; anything else goes to the browser.
    pub fn open_in_new_tab<F>(&mut self, factory: &mut F, url: &str)
    where
        F: SurfaceFactory<Surface = S>,
    {
        if !is_figma_url(url) {
            debug!(url, "not a Figma URL, opening externally");
            if let Err(e) = self.opener.open(url) {
                warn!(url, error = %e, "external open failed");
            }
            return;
        }

        if let Err(e) = self.open_tab(factory, url) {
            warn!(url, error = %e, "failed to open tab");
        }
    }

    // -- surface events --

    /// Apply an event raised by a surface. Returns the prompts the host
    /// must now show.
    pub fn handle_event(&mut self, event: TabEvent) -> Vec<PendingPrompt> {
        match event {
            TabEvent::PageLoad {
                tab_id,
                state: PageLoadState::Finished,
                url,
            } => {
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    tab.on_page_loaded(&url);
                }
                Vec::new()
            }
            TabEvent::PageLoad { tab_id, url, .. } => {
                debug!(%tab_id, url, "page load started");
                Vec::new()
            }
            TabEvent::TitleChanged { tab_id, title } => {
                if let Some(tab) = self.tabs.get_mut(&tab_id) {
                    tab.set_title(title);
                }
                Vec::new()
            }
            TabEvent::Ipc { tab_id, body } => self.dispatch_ipc(tab_id, &body),
        }
    }

    /// Offer a page message to every tab; each one checks the sender.
    fn dispatch_ipc(&mut self, sender: TabId, body: &str) -> Vec<PendingPrompt> {
        let Some(message) = TabMessage::from_json(body) else {
            debug!(%sender, body, "unhandled ipc message");
            return Vec::new();
        };

        let mut prompts = Vec::new();
        for id in &self.order {
            let Some(tab) = self.tabs.get_mut(id) else {
                continue;
            };
            if let Some(request) = tab.handle_message(sender, message.clone()) {
                prompts.push(PendingPrompt {
                    tab_id: *id,
                    request,
                });
            }
        }
        prompts
    }
}
