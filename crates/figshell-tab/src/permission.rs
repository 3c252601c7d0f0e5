//! Permission requests coming from tab content.
//!
//! Only microphone access (`media`) can ever be granted. Everything else is
//! denied without asking the user.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Permission names a content surface can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    ClipboardRead,
    Media,
    DisplayCapture,
    MediaKeySystem,
    Geolocation,
    Notifications,
    Midi,
    MidiSysex,
    PointerLock,
    Fullscreen,
    OpenExternal,
    WindowPlacement,
    Unknown,
}

impl PermissionKind {
    /// Parse the host's permission name. Unrecognized names map to `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "clipboard-read" => Self::ClipboardRead,
            "media" => Self::Media,
            "display-capture" => Self::DisplayCapture,
            "mediaKeySystem" => Self::MediaKeySystem,
            "geolocation" => Self::Geolocation,
            "notifications" => Self::Notifications,
            "midi" => Self::Midi,
            "midiSysex" => Self::MidiSysex,
            "pointerLock" => Self::PointerLock,
            "fullscreen" => Self::Fullscreen,
            "openExternal" => Self::OpenExternal,
            "window-placement" => Self::WindowPlacement,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClipboardRead => "clipboard-read",
            Self::Media => "media",
            Self::DisplayCapture => "display-capture",
            Self::MediaKeySystem => "mediaKeySystem",
            Self::Geolocation => "geolocation",
            Self::Notifications => "notifications",
            Self::Midi => "midi",
            Self::MidiSysex => "midiSysex",
            Self::PointerLock => "pointerLock",
            Self::Fullscreen => "fullscreen",
            Self::OpenExternal => "openExternal",
            Self::WindowPlacement => "window-placement",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion callback for a permission request: `true` grants.
pub type PermissionCallback = Box<dyn FnOnce(bool) + Send>;

/// Which button is focused when the prompt opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultButton {
    Ok,
    Cancel,
}

/// What to ask the user. The host renders it as a modal question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: String,
    pub message: String,
    pub detail: String,
    pub ok_label: String,
    pub cancel_label: String,
    pub default_button: DefaultButton,
}

impl PromptRequest {
    pub fn microphone() -> Self {
        Self {
            title: "Figma".into(),
            message: "Microphone access required for voice call.".into(),
            detail: "Allow microphone access?".into(),
            ok_label: "Allow".into(),
            cancel_label: "Deny".into(),
            default_button: DefaultButton::Ok,
        }
    }
}

/// Asks the user a yes/no question. Returning `false` covers both an
/// explicit deny and a dismissed dialog.
#[async_trait]
pub trait PermissionPrompt: Send + Sync {
    async fn confirm(&self, request: &PromptRequest) -> bool;
}
