//! Tab hosting and navigation/permission gatekeeping for figshell.
//!
//! - [`url_rules`]: URL shape predicates
//! - [`navigation`]: will-navigate and new-window policy ([`Gatekeeper`])
//! - [`permission`]: permission kinds and the user prompt seam
//! - [`tab`]: [`Tab`], which owns one content surface
//! - [`ipc`]: page <-> shell messages
//! - [`location`]: where a surface is, for the navigation callback
//! - [`webview`]: the wry-backed content surface

pub mod events;
pub mod external;
pub mod ipc;
pub mod location;
pub mod navigation;
pub mod permission;
pub mod surface;
pub mod tab;
pub mod url_rules;

#[cfg(feature = "webview")]
pub mod webview;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use events::{EventQueue, PageLoadState, TabEvent};
pub use external::{ExternalOpener, SystemOpener};
pub use ipc::{IpcMessage, TabMessage};
pub use location::LocationState;
pub use navigation::{Gatekeeper, NavigationDecision, NewWindowAction};
pub use permission::{PermissionCallback, PermissionKind, PermissionPrompt, PromptRequest};
pub use surface::ContentSurface;
pub use tab::Tab;
