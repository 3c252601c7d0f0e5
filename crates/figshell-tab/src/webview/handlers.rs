//! Callback attachments that feed webview events into the gatekeeper and
//! the host's event queue.

use std::sync::{Arc, Mutex};

use figshell_common::TabId;
use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{EventQueue, PageLoadState, TabEvent};
use crate::ipc::{location_update, IpcMessage};
use crate::location::LocationState;
use crate::navigation::Gatekeeper;

/// Forward page messages to the host. In-page URL changes are also
/// applied to `location` right away, ahead of the next navigation check.
pub(super) fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: EventQueue,
    location: Arc<Mutex<LocationState>>,
    tab_id: TabId,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body().to_string();

        let Some(message) = IpcMessage::from_json(&body) else {
            warn!(
                %tab_id,
                body_len = body.len(),
                "IPC message rejected: malformed envelope"
            );
            return;
        };

        if let Some(url) = location_update(&message) {
            if let Ok(mut loc) = location.lock() {
                loc.set_current(url);
            }
        }

        debug!(%tab_id, body_len = body.len(), "IPC message from page");
        events.push(TabEvent::Ipc { tab_id, body });
    })
}

pub(super) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: EventQueue,
    location: Arc<Mutex<LocationState>>,
    tab_id: TabId,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(%tab_id, ?state, url = %url, "page load");
        if let Ok(mut loc) = location.lock() {
            loc.on_page_load(&url);
        }
        events.push(TabEvent::PageLoad { tab_id, state, url });
    })
}

pub(super) fn attach_title_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: EventQueue,
    tab_id: TabId,
) -> WebViewBuilder<'a> {
    builder.with_document_title_changed_handler(move |title| {
        debug!(%tab_id, title = %title, "title changed");
        events.push(TabEvent::TitleChanged { tab_id, title });
    })
}

/// Run every page-initiated navigation through the gatekeeper.
pub(super) fn attach_navigation_handler<'a>(
    builder: WebViewBuilder<'a>,
    gatekeeper: Gatekeeper,
    location: Arc<Mutex<LocationState>>,
) -> WebViewBuilder<'a> {
    builder.with_navigation_handler(move |target| {
        let current = match location.lock() {
            Ok(mut loc) => {
                if loc.take_bypass(&target) {
                    debug!(tab_id = %gatekeeper.tab_id(), url = %target, "shell load, not gatekept");
                    return true;
                }
                loc.current().to_string()
            }
            Err(_) => String::new(),
        };
        gatekeeper.will_navigate(&current, &target).proceeds()
    })
}

/// New windows are never created; the gatekeeper decides where the URL goes.
pub(super) fn attach_new_window_handler<'a>(
    builder: WebViewBuilder<'a>,
    gatekeeper: Gatekeeper,
) -> WebViewBuilder<'a> {
    builder.with_new_window_req_handler(move |url| {
        gatekeeper.new_window(&url);
        false
    })
}
