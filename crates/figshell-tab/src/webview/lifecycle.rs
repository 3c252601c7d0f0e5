use std::sync::{Arc, Mutex};

use figshell_common::{Rect, TabId};
use tracing::{debug, warn};
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::events::EventQueue;
use crate::ipc::IPC_INIT_SCRIPT;
use crate::location::LocationState;
use crate::navigation::Gatekeeper;

use super::handlers;
use super::{to_wry_rect, SurfaceConfig, WrySurface};

/// Create a tab surface as a child of `window`, positioned at `bounds`.
///
/// `id` must come from [`super::next_surface_id`] and match the
/// gatekeeper's tab id.
pub fn create_surface<W: raw_window_handle::HasWindowHandle>(
    id: TabId,
    window: &W,
    bounds: Rect,
    config: &SurfaceConfig,
    gatekeeper: Gatekeeper,
    events: EventQueue,
) -> Result<WrySurface, wry::Error> {
    let location = Arc::new(Mutex::new(LocationState::loading(&config.url)));

    let mut builder = WebViewBuilder::new()
        .with_bounds(to_wry_rect(bounds))
        .with_devtools(config.devtools)
        .with_clipboard(config.clipboard)
        .with_autoplay(config.autoplay)
        .with_focused(true)
        .with_initialization_script(IPC_INIT_SCRIPT);

    if let Some(ua) = &config.user_agent {
        builder = builder.with_user_agent(ua);
    }

    builder =
        handlers::attach_ipc_handler(builder, events.clone(), Arc::clone(&location), id);
    builder =
        handlers::attach_page_load_handler(builder, events.clone(), Arc::clone(&location), id);
    builder = handlers::attach_title_handler(builder, events, id);
    builder = handlers::attach_navigation_handler(
        builder,
        gatekeeper.clone(),
        Arc::clone(&location),
    );
    builder = handlers::attach_new_window_handler(builder, gatekeeper);

    let webview = builder.with_url(&config.url).build_as_child(window)?;

    if (config.zoom - 1.0).abs() > f64::EPSILON {
        if let Err(e) = webview.zoom(config.zoom) {
            warn!(tab_id = %id, zoom = config.zoom, error = %e, "initial zoom failed");
        }
    }

    debug!(tab_id = %id, url = %config.url, "surface created");

    Ok(WrySurface {
        webview,
        id,
        location,
        auto_resize: false,
    })
}
