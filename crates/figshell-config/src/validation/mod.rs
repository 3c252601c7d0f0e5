//! Configuration validation.
//!
//! Each check pushes a message; all failures are reported together in a
//! single `ConfigError::ValidationError`.

mod helpers;


use crate::schema::ShellConfig;
use figshell_common::ConfigError;

use helpers::{validate_range_f64, validate_url};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ShellConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_url(&mut errors, "app.home_url", &config.app.home_url);
    validate_url(&mut errors, "app.login_url", &config.app.login_url);
    if let Some(ua) = &config.app.user_agent {
        if ua.trim().is_empty() {
            errors.push("app.user_agent must not be empty when set".into());
        }
    }

    validate_range_f64(&mut errors, "tab.zoom", config.tab.zoom, 0.25, 5.0);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
