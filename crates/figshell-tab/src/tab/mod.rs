//! A single document tab and its navigation/permission gatekeeping.

use std::sync::{Arc, Mutex};

use figshell_common::{Rect, SurfaceError, TabId, WindowId};
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::ipc::TabMessage;
use crate::navigation::{Gatekeeper, NavigationDecision, NewWindowAction};
use crate::permission::{PermissionCallback, PermissionKind, PermissionPrompt, PromptRequest};
use crate::surface::ContentSurface;

#[cfg(test)]
mod tests;

/// One isolated unit of document content.
///
/// A tab owns its surface for its whole life; the tab's id is the
/// surface's id and never changes. Dropping the tab drops the surface and
/// denies any permission request still waiting on a prompt.
pub struct Tab<S: ContentSurface> {
    id: TabId,
    window_id: WindowId,
    title: Option<String>,
    url: Option<String>,
    moves: bool,
    file_key: Option<String>,
    is_using_microphone: bool,
    is_in_voice_call: bool,
    surface: S,
    gatekeeper: Gatekeeper,
    /// Callbacks waiting on the outstanding microphone prompt.
    pending_permission: Vec<PermissionCallback>,
    /// Settled page-initiated requests not yet reported back to the page.
    page_results: Arc<Mutex<Vec<(PermissionKind, bool)>>>,
}

impl<S: ContentSurface> Tab<S> {
    /// Wrap a freshly created surface and ask the coordinator for bounds.
    pub fn new(window_id: WindowId, surface: S, gatekeeper: Gatekeeper) -> Self {
        let id = surface.id();
        if gatekeeper.tab_id() != id {
            warn!(
                tab_id = %id,
                gatekeeper_tab = %gatekeeper.tab_id(),
                "gatekeeper built for a different surface"
            );
        }

        let mut tab = Self {
            id,
            window_id,
            title: None,
            url: surface.url(),
            moves: false,
            file_key: None,
            is_using_microphone: false,
            is_in_voice_call: false,
            surface,
            gatekeeper,
            pending_permission: Vec::new(),
            page_results: Arc::default(),
        };

        tab.set_autosize(true);
        tab.gatekeeper.coordinator().request_bounds(window_id);
        info!(tab_id = %id, %window_id, "tab created");
        tab
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Last URL loaded into or reported by the surface.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn moves(&self) -> bool {
        self.moves
    }

    /// Mark the tab as being dragged or reordered.
    pub fn set_moves(&mut self, moves: bool) {
        self.moves = moves;
    }

    pub fn file_key(&self) -> Option<&str> {
        self.file_key.as_deref()
    }

    pub fn is_using_microphone(&self) -> bool {
        self.is_using_microphone
    }

    pub fn is_in_voice_call(&self) -> bool {
        self.is_in_voice_call
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    // -- commands from the host --

    pub fn load_url(&mut self, url: &str) -> Result<(), SurfaceError> {
        self.url = Some(url.to_string());
        self.surface.load_url(url)
    }

    /// Record a URL the surface finished navigating to, or moved to
    /// in-page.
    pub fn on_page_loaded(&mut self, url: &str) {
        self.url = Some(url.to_string());
    }

    pub fn set_autosize(&mut self, enabled: bool) {
        self.surface.set_auto_resize(enabled);
    }

    pub fn set_bounds(&self, bounds: Rect) {
        if let Err(e) = self.surface.set_bounds(bounds) {
            warn!(tab_id = %self.id, error = %e, "failed to set bounds");
        }
    }

    pub fn reload(&self) {
        if let Err(e) = self.surface.reload() {
            warn!(tab_id = %self.id, error = %e, "reload failed");
        }
    }

    pub fn toggle_devtools(&self) {
        self.surface.toggle_devtools();
    }

    /// Apply the page's UI scale as the surface zoom factor.
    pub fn update_scale(&self, scale: f64) {
        debug!(tab_id = %self.id, scale, "update scale");
        if let Err(e) = self.surface.set_zoom(scale) {
            warn!(tab_id = %self.id, scale, error = %e, "failed to set zoom");
        }
    }

    /// Record the document key reported by the surface `sender`.
    ///
    /// Reports from any other surface are ignored. Returns whether the key
    /// was applied.
    pub fn update_file_key(&mut self, sender: TabId, window_id: WindowId, key: &str) -> bool {
        debug!(tab_id = %self.id, %sender, %window_id, key, "update file key");
        if sender != self.id {
            return false;
        }
        self.file_key = Some(key.to_string());
        true
    }

    // -- navigation --

    /// Decide whether the surface may navigate to `target`.
    pub fn on_will_navigate(&self, target: &str) -> NavigationDecision {
        let current = self.surface.url().unwrap_or_default();
        self.gatekeeper.will_navigate(&current, target)
    }

    /// Handle an in-page request for a new window. The host-created window
    /// itself is never kept.
    pub fn on_new_window(&self, url: &str) -> NewWindowAction {
        self.gatekeeper.new_window(url)
    }

    // -- permissions --

    /// Whether a microphone prompt is waiting for the user.
    pub fn prompt_outstanding(&self) -> bool {
        !self.pending_permission.is_empty()
    }

    /// Evaluate a permission request.
    ///
    /// Either calls `callback` right away or queues it behind a prompt.
    /// Returns `Some(prompt)` when the host must show that prompt and then
    /// call [`Tab::resolve_permission_prompt`] with the answer. Returns
    /// `None` when no new prompt is needed.
    pub fn handle_permission_request(
        &mut self,
        kind: PermissionKind,
        callback: PermissionCallback,
    ) -> Option<PromptRequest> {
        if kind != PermissionKind::Media {
            debug!(tab_id = %self.id, %kind, "permission denied: unsupported kind");
            callback(false);
            return None;
        }

        if self.is_using_microphone {
            debug!(tab_id = %self.id, "microphone already granted");
            callback(true);
            return None;
        }

        let first = self.pending_permission.is_empty();
        self.pending_permission.push(callback);
        if first {
            info!(tab_id = %self.id, "prompting for microphone access");
            Some(PromptRequest::microphone())
        } else {
            debug!(tab_id = %self.id, "joined outstanding microphone prompt");
            None
        }
    }

    /// Deliver the user's answer to the outstanding microphone prompt.
    pub fn resolve_permission_prompt(&mut self, granted: bool) {
        if self.pending_permission.is_empty() {
            debug!(tab_id = %self.id, granted, "no prompt outstanding, answer dropped");
            return;
        }

        info!(tab_id = %self.id, granted, "microphone prompt answered");
        if granted {
            self.set_using_microphone(true);
        }
        for callback in self.pending_permission.drain(..) {
            callback(granted);
        }
        self.report_permission_results();
    }

    /// Request a permission, showing `prompt` if the user must decide.
    ///
    /// Holding `&mut self` across the prompt defers every other event for
    /// this tab until the user answers; other tabs are unaffected.
    pub async fn request_permission(
        &mut self,
        kind: PermissionKind,
        prompt: &dyn PermissionPrompt,
    ) -> bool {
        if self.prompt_outstanding() {
            // The host owns that prompt and cannot answer while we hold the tab.
            warn!(tab_id = %self.id, %kind, "prompt already outstanding, denying");
            return false;
        }

        let (tx, rx) = oneshot::channel();
        let callback: PermissionCallback = Box::new(move |granted| {
            let _ = tx.send(granted);
        });

        if let Some(request) = self.handle_permission_request(kind, callback) {
            let granted = prompt.confirm(&request).await;
            self.resolve_permission_prompt(granted);
        }

        rx.await.unwrap_or(false)
    }

    /// Page-initiated microphone request. Nothing to do if already granted.
    pub fn request_microphone_permission(&mut self) -> Option<PromptRequest> {
        if self.is_using_microphone {
            return None;
        }
        self.page_permission_request(PermissionKind::Media)
    }

    /// A permission request made by the page itself. Its answer goes back
    /// to the page as `permissionResult` once settled.
    fn page_permission_request(&mut self, kind: PermissionKind) -> Option<PromptRequest> {
        let id = self.id;
        let results = Arc::clone(&self.page_results);
        let callback: PermissionCallback = Box::new(move |granted| {
            debug!(tab_id = %id, %kind, granted, "page permission request settled");
            if let Ok(mut results) = results.lock() {
                results.push((kind, granted));
            }
        });

        let prompt = self.handle_permission_request(kind, callback);
        self.report_permission_results();
        prompt
    }

    fn report_permission_results(&self) {
        let settled = match self.page_results.lock() {
            Ok(mut results) => std::mem::take(&mut *results),
            Err(_) => return,
        };
        for (kind, granted) in settled {
            self.send_to_page(
                "permissionResult",
                json!({ "id": self.id, "kind": kind.as_str(), "granted": granted }),
            );
        }
    }

    // -- state signals --

    pub fn set_using_microphone(&mut self, is_using_microphone: bool) {
        self.is_using_microphone = is_using_microphone;
        self.send_to_page(
            "setUsingMicrophone",
            json!({ "id": self.id, "isUsingMicrophone": is_using_microphone }),
        );
    }

    pub fn set_is_in_voice_call(&mut self, is_in_voice_call: bool) {
        self.is_in_voice_call = is_in_voice_call;
        self.send_to_page(
            "setIsInVoiceCall",
            json!({ "id": self.id, "isInVoiceCall": is_in_voice_call }),
        );
    }

    /// Apply a decoded IPC message sent by surface `sender`.
    ///
    /// Messages from other surfaces are ignored. Returns a prompt the host
    /// must show, if the message started one.
    pub fn handle_message(&mut self, sender: TabId, message: TabMessage) -> Option<PromptRequest> {
        if let TabMessage::UpdateFileKey { window_id, key } = &message {
            self.update_file_key(sender, *window_id, key);
            return None;
        }

        if sender != self.id {
            debug!(tab_id = %self.id, %sender, ?message, "message from another surface ignored");
            return None;
        }

        match message {
            TabMessage::UpdateUiScale(scale) => self.update_scale(scale),
            TabMessage::RequestMicrophonePermission => return self.request_microphone_permission(),
            TabMessage::PermissionRequest(kind) => return self.page_permission_request(kind),
            TabMessage::SetUsingMicrophone(on) => self.set_using_microphone(on),
            TabMessage::SetIsInVoiceCall(on) => self.set_is_in_voice_call(on),
            TabMessage::LocationChanged(url) => self.on_page_loaded(&url),
            TabMessage::UpdateFileKey { .. } => {}
        }
        None
    }

    fn send_to_page(&self, channel: &str, payload: serde_json::Value) {
        if let Err(e) = self.surface.send(channel, &payload) {
            warn!(tab_id = %self.id, channel, error = %e, "failed to message page");
        }
    }
}

impl<S: ContentSurface> Drop for Tab<S> {
    fn drop(&mut self) {
        for callback in self.pending_permission.drain(..) {
            callback(false);
        }
        debug!(tab_id = %self.id, "tab closed");
    }
}
