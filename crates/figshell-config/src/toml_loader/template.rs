//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# figshell configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[app]
# home_url = "https://www.figma.com/files/recent"
# login_url = "https://www.figma.com/login"
# user_agent = "Mozilla/5.0 (X11; Linux x86_64) figshell"

[tab]
# zoom = 1.0            # 0.25-5.0
# devtools = false
# autoplay = true
# clipboard = true

[logging]
# level = "info"        # trace, debug, info, warn, error
"##
}
