//! Configuration schema types for figshell.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod app;
mod logging;
mod tab;

pub use app::*;
pub use logging::*;
pub use tab::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for figshell.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    pub app: AppConfig,
    pub tab: TabConfig,
    pub logging: LoggingConfig,
}
