use serde::{Deserialize, Serialize};

/// Options applied to every tab surface at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabConfig {
    /// Initial zoom factor (valid range: 0.25-5.0).
    pub zoom: f64,
    /// Allow opening devtools (always on in debug builds).
    pub devtools: bool,
    pub autoplay: bool,
    pub clipboard: bool,
}

impl Default for TabConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            devtools: cfg!(debug_assertions),
            autoplay: true,
            clipboard: true,
        }
    }
}
