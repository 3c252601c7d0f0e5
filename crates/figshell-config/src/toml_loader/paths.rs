//! Where figshell keeps its config file, and seeding it on first run.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use figshell_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "figshell";
const CONFIG_FILE: &str = "config.toml";

/// `<base>/figshell/config.toml`.
pub(super) fn config_path_in(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(CONFIG_FILE)
}

/// The config file under the user's config directory
/// (`~/.config/figshell/config.toml` on Linux).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    match dirs::config_dir() {
        Some(base) => Ok(config_path_in(&base)),
        None => Err(ConfigError::ParseError(
            "no user config directory on this platform".into(),
        )),
    }
}

/// Seed `path` with the commented default config. An existing file is
/// never overwritten.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let seed_failed =
        |e: std::io::Error| ConfigError::ParseError(format!("cannot seed {}: {e}", path.display()));

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(seed_failed)?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(seed_failed)?;
    file.write_all(default_config_toml().as_bytes())
        .map_err(seed_failed)?;

    info!(path = %path.display(), "seeded default config");
    Ok(())
}
