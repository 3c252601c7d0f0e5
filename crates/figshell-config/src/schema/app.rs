//! Application-level URLs and identity.

use serde::{Deserialize, Serialize};

/// Where tabs start and where they go after sign-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URL loaded into the first tab.
    pub home_url: String,
    /// URL every tab reloads to after a sign-out.
    pub login_url: String,
    /// User agent presented by every tab surface.
    pub user_agent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_url: "https://www.figma.com/files/recent".into(),
            login_url: "https://www.figma.com/login".into(),
            user_agent: None,
        }
    }
}
