//! The content-hosting surface a tab owns.

use figshell_common::{Rect, SurfaceError, TabId};

/// An embedded browser view rendering the tab's web content.
///
/// Implemented by [`crate::webview::WrySurface`] in the application and by
/// in-memory fakes in tests. A surface's `id` never changes.
pub trait ContentSurface {
    /// Identity assigned by the host when the surface was created.
    fn id(&self) -> TabId;

    /// URL currently shown, if anything has loaded yet.
    fn url(&self) -> Option<String>;

    fn load_url(&mut self, url: &str) -> Result<(), SurfaceError>;

    /// Deliver a named message with a JSON payload to the page.
    fn send(&self, channel: &str, payload: &serde_json::Value) -> Result<(), SurfaceError>;

    fn set_zoom(&self, factor: f64) -> Result<(), SurfaceError>;

    fn set_bounds(&self, bounds: Rect) -> Result<(), SurfaceError>;

    /// Whether the surface should follow the window size on resize.
    fn set_auto_resize(&mut self, enabled: bool);

    fn auto_resize(&self) -> bool;

    /// Show or hide the surface. Only the selected tab is visible.
    fn set_visible(&self, visible: bool) -> Result<(), SurfaceError>;

    fn reload(&self) -> Result<(), SurfaceError>;

    fn toggle_devtools(&self);
}
