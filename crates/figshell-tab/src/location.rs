//! Where a surface is, as seen from its webview callbacks.
//!
//! The navigation callback runs before the host drains any events, so the
//! URL it compares against has to be tracked right here: page loads and
//! in-page history changes both move it.

use url::Url;

#[derive(Debug, Default)]
pub struct LocationState {
    /// URL the page currently shows.
    current: String,
    /// A load the shell started itself. Shell-initiated loads and reloads
    /// are not page navigations and skip the gatekeeper once.
    expected: Option<String>,
}

impl LocationState {
    /// State for a surface about to load `initial`.
    pub fn loading(initial: &str) -> Self {
        Self {
            current: String::new(),
            expected: Some(initial.to_string()),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// The page moved without a load (`pushState`, `replaceState`,
    /// back/forward within the document).
    pub fn set_current(&mut self, url: &str) {
        self.current.clear();
        self.current.push_str(url);
    }

    /// A page load started or finished at `url`. Any pending shell load has
    /// either begun or been superseded, so its bypass is dropped.
    pub fn on_page_load(&mut self, url: &str) {
        self.set_current(url);
        self.expected = None;
    }

    /// Mark `url` as a load the shell is about to start.
    pub fn expect(&mut self, url: &str) {
        self.expected = Some(url.to_string());
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    /// Consume the pending bypass if `target` is the shell's own load.
    pub fn take_bypass(&mut self, target: &str) -> bool {
        match self.expected.take() {
            Some(expected) if same_url(&expected, target) => true,
            other => {
                self.expected = other;
                false
            }
        }
    }
}

/// Equal after URL normalization; unparsable input compares as raw text.
fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
