//! Handing URLs to the operating system's default handler.

use figshell_common::ShellError;

/// Opens a URL outside the shell (normally the system browser).
pub trait ExternalOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), ShellError>;
}

/// [`ExternalOpener`] that delegates to the desktop's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), ShellError> {
        open::that(url).map_err(|e| ShellError::Open {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
