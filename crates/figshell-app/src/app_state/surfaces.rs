//! Creates wry surfaces for new tabs inside the main window.

use std::sync::Arc;

use winit::window::Window;

use figshell_common::{Rect, ShellError, TabId};
use figshell_config::ShellConfig;
use figshell_tab::webview::{create_surface, next_surface_id, SurfaceConfig, WrySurface};
use figshell_tab::{EventQueue, Gatekeeper};

use crate::manager::SurfaceFactory;

/// The window's drawable area in logical pixels.
pub(super) fn content_rect(window: &Window) -> Rect {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    Rect::new(0.0, 0.0, size.width, size.height)
}

/// Surface options shared by every tab, minus the URL.
fn surface_config(config: &ShellConfig, url: &str) -> SurfaceConfig {
    SurfaceConfig {
        url: url.to_string(),
        user_agent: config.app.user_agent.clone(),
        devtools: config.tab.devtools,
        clipboard: config.tab.clipboard,
        autoplay: config.tab.autoplay,
        zoom: config.tab.zoom,
    }
}

pub struct WrySurfaceFactory {
    window: Arc<Window>,
    events: EventQueue,
    config: ShellConfig,
}

impl WrySurfaceFactory {
    pub(super) fn new(window: Arc<Window>, events: EventQueue, config: ShellConfig) -> Self {
        Self {
            window,
            events,
            config,
        }
    }
}

impl SurfaceFactory for WrySurfaceFactory {
    type Surface = WrySurface;

    fn next_id(&mut self) -> TabId {
        next_surface_id()
    }

    fn create(
        &mut self,
        id: TabId,
        url: &str,
        gatekeeper: Gatekeeper,
    ) -> Result<WrySurface, ShellError> {
        create_surface(
            id,
            self.window.as_ref(),
            content_rect(&self.window),
            &surface_config(&self.config, url),
            gatekeeper,
            self.events.clone(),
        )
        .map_err(|e| ShellError::WebView(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_config_follows_tab_settings() {
        let mut config = ShellConfig::default();
        config.app.user_agent = Some("figshell/0.1".into());
        config.tab.zoom = 1.25;
        config.tab.autoplay = false;

        let sc = surface_config(&config, "https://www.figma.com/files/recent");
        assert_eq!(sc.url, "https://www.figma.com/files/recent");
        assert_eq!(sc.user_agent.as_deref(), Some("figshell/0.1"));
        assert!((sc.zoom - 1.25).abs() < f64::EPSILON);
        assert!(!sc.autoplay);
        assert_eq!(sc.devtools, config.tab.devtools);
    }
}
