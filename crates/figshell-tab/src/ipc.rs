//! IPC protocol between a tab's page and the shell.
//!
//! - **Page -> shell**: the page calls
//!   `window.figshell.ipc.send(kind, payload)`, which posts
//!   `{"kind": ..., "payload": ...}` through the webview's IPC channel.
//! - **Shell -> page**: the shell evaluates a snippet produced by
//!   [`js_dispatch_message`], which invokes the handler the page registered
//!   with `window.figshell.ipc.on(kind, callback)`.

use figshell_common::WindowId;
use serde::{Deserialize, Serialize};

use crate::permission::PermissionKind;

/// Raw IPC envelope as posted by the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// A decoded message a tab knows how to handle.
#[derive(Debug, Clone, PartialEq)]
pub enum TabMessage {
    /// `updateFigmaUiScale(scale)`
    UpdateUiScale(f64),
    /// `updateFileKey({windowId, key})`
    UpdateFileKey { window_id: WindowId, key: String },
    /// `requestMicrophonePermission`
    RequestMicrophonePermission,
    /// `permissionRequest("<name>")`
    PermissionRequest(PermissionKind),
    /// `setUsingMicrophone(bool)`
    SetUsingMicrophone(bool),
    /// `setIsInVoiceCall(bool)`
    SetIsInVoiceCall(bool),
    /// `locationChanged(href)`, posted by the history hook in
    /// [`IPC_INIT_SCRIPT`] when the page moves without a load.
    LocationChanged(String),
}

impl TabMessage {
    /// Decode an envelope. Unknown kinds and malformed payloads yield `None`.
    pub fn decode(msg: &IpcMessage) -> Option<Self> {
        let payload = &msg.payload;
        match msg.kind.as_str() {
            "updateFigmaUiScale" => payload
                .as_f64()
                .filter(|scale| scale.is_finite() && *scale > 0.0)
                .map(Self::UpdateUiScale),
            "updateFileKey" => {
                let window_id = payload.get("windowId")?.as_u64()?;
                let key = payload.get("key")?.as_str()?;
                Some(Self::UpdateFileKey {
                    window_id: WindowId(u32::try_from(window_id).ok()?),
                    key: key.to_string(),
                })
            }
            "requestMicrophonePermission" => Some(Self::RequestMicrophonePermission),
            "permissionRequest" => payload
                .as_str()
                .map(|name| Self::PermissionRequest(PermissionKind::parse(name))),
            "setUsingMicrophone" => payload.as_bool().map(Self::SetUsingMicrophone),
            "setIsInVoiceCall" => payload.as_bool().map(Self::SetIsInVoiceCall),
            "locationChanged" => location_update(msg).map(|url| Self::LocationChanged(url.into())),
            _ => None,
        }
    }

    /// Parse and decode a raw JSON body in one step.
    pub fn from_json(raw: &str) -> Option<Self> {
        IpcMessage::from_json(raw).as_ref().and_then(Self::decode)
    }
}

/// The new page URL carried by a `locationChanged` message.
pub fn location_update(msg: &IpcMessage) -> Option<&str> {
    if msg.kind != "locationChanged" {
        return None;
    }
    msg.payload.as_str().filter(|url| !url.is_empty())
}

/// JavaScript snippet that sets up the IPC bridge on the page side.
/// Injected as an initialization script into every tab surface.
///
/// It also reports in-page URL changes (`pushState`, `replaceState`,
/// back/forward) as `locationChanged`, since those never fire a page load.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.figshell = window.figshell || {};
    window.figshell.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        },
        _handlers: {},
        on: function(kind, callback) {
            this._handlers[kind] = callback;
        },
        _dispatch: function(kind, payload) {
            var handler = this._handlers[kind];
            if (handler) {
                handler(payload);
            }
        }
    };

    var last = location.href;
    function report() {
        if (location.href !== last) {
            last = location.href;
            window.figshell.ipc.send("locationChanged", last);
        }
    }
    ["pushState", "replaceState"].forEach(function(name) {
        var original = history[name];
        history[name] = function() {
            var result = original.apply(this, arguments);
            report();
            return result;
        };
    });
    window.addEventListener("popstate", report);
    window.addEventListener("hashchange", report);
})();
"#;

/// Generate a JS snippet that dispatches a message to the page's handler.
pub fn js_dispatch_message(kind: &str, payload: &serde_json::Value) -> String {
    let payload_json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!(
        "window.figshell && window.figshell.ipc._dispatch({}, {});",
        serde_json::to_string(kind).unwrap_or_else(|_| "\"unknown\"".to_string()),
        payload_json,
    )
}
