use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by a content-hosting surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface unavailable: {0}")]
    Unavailable(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("bounds error: {0}")]
    Bounds(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("external open failed for {url}: {reason}")]
    Open { url: String, reason: String },

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}
