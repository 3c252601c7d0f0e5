//! wry-backed content surface.
//!
//! Each tab gets one child `wry::WebView` inside the host window. The
//! webview's navigation and new-window callbacks are wired straight into
//! the tab's [`Gatekeeper`](crate::Gatekeeper).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use figshell_common::{Rect, SurfaceError, TabId};
use tracing::warn;
use wry::WebView;

use crate::location::LocationState;
use crate::surface::ContentSurface;

mod handlers;
mod lifecycle;

pub use lifecycle::create_surface;

static NEXT_SURFACE_ID: AtomicU32 = AtomicU32::new(1);

/// Allocate the identity for the next surface (and therefore the next tab).
pub fn next_surface_id() -> TabId {
    TabId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Options for creating a tab surface.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Initial URL to load.
    pub url: String,
    pub user_agent: Option<String>,
    pub devtools: bool,
    pub clipboard: bool,
    pub autoplay: bool,
    pub zoom: f64,
}

impl SurfaceConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: None,
            devtools: cfg!(debug_assertions),
            clipboard: true,
            autoplay: true,
            zoom: 1.0,
        }
    }
}

/// Convert our logical `Rect` into a wry `Rect`.
pub fn to_wry_rect(rect: Rect) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(rect.x, rect.y)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(rect.width, rect.height)),
    }
}

fn script_error(e: wry::Error) -> SurfaceError {
    SurfaceError::Script(e.to_string())
}

/// A tab's webview.
pub struct WrySurface {
    webview: WebView,
    id: TabId,
    location: Arc<Mutex<LocationState>>,
    auto_resize: bool,
}

impl WrySurface {
    fn expect(&self, url: &str) {
        if let Ok(mut loc) = self.location.lock() {
            loc.expect(url);
        }
    }

    pub fn inner(&self) -> &WebView {
        &self.webview
    }
}

impl ContentSurface for WrySurface {
    fn id(&self) -> TabId {
        self.id
    }

    fn url(&self) -> Option<String> {
        match self.webview.url() {
            Ok(url) if !url.is_empty() => Some(url),
            _ => self
                .location
                .lock()
                .ok()
                .map(|loc| loc.current().to_string())
                .filter(|u| !u.is_empty()),
        }
    }

    fn load_url(&mut self, url: &str) -> Result<(), SurfaceError> {
        self.expect(url);
        self.webview.load_url(url).map_err(script_error)
    }

    fn send(&self, channel: &str, payload: &serde_json::Value) -> Result<(), SurfaceError> {
        let script = crate::ipc::js_dispatch_message(channel, payload);
        self.webview.evaluate_script(&script).map_err(script_error)
    }

    fn set_zoom(&self, factor: f64) -> Result<(), SurfaceError> {
        self.webview.zoom(factor).map_err(script_error)
    }

    fn set_bounds(&self, bounds: Rect) -> Result<(), SurfaceError> {
        self.webview
            .set_bounds(to_wry_rect(bounds))
            .map_err(|e| SurfaceError::Bounds(e.to_string()))
    }

    fn set_auto_resize(&mut self, enabled: bool) {
        self.auto_resize = enabled;
    }

    fn auto_resize(&self) -> bool {
        self.auto_resize
    }

    fn set_visible(&self, visible: bool) -> Result<(), SurfaceError> {
        self.webview
            .set_visible(visible)
            .map_err(|e| SurfaceError::Other(e.to_string()))
    }

    fn reload(&self) -> Result<(), SurfaceError> {
        if let Some(url) = self.url() {
            self.expect(&url);
        }
        self.webview
            .evaluate_script("window.location.reload();")
            .map_err(script_error)
    }

    fn toggle_devtools(&self) {
        if self.webview.is_devtools_open() {
            self.webview.close_devtools();
        } else {
            self.webview.open_devtools();
        }
    }
}

impl Drop for WrySurface {
    fn drop(&mut self) {
        if let Err(e) = self.webview.set_visible(false) {
            warn!(tab_id = %self.id, error = %e, "failed to hide surface on close");
        }
    }
}
