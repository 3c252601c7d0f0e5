//! Events raised by tab surfaces for the host's event loop.

use std::sync::{Arc, Mutex};

use figshell_common::TabId;
use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

#[cfg(feature = "webview")]
impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by a tab surface.
#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    PageLoad {
        tab_id: TabId,
        state: PageLoadState,
        url: String,
    },
    TitleChanged {
        tab_id: TabId,
        title: String,
    },
    /// Raw IPC body posted by the page.
    Ipc {
        tab_id: TabId,
        body: String,
    },
}

/// Queue the surface callbacks push into and the event loop drains.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Arc<Mutex<Vec<TabEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: TabEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<TabEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}
