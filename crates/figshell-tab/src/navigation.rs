//! Navigation and new-window policy for tab surfaces.
//!
//! [`classify_navigation`] and [`classify_new_window`] are pure: they look
//! only at the URLs. [`Gatekeeper`] wraps them and carries out the side
//! effects (external open, sign-out, open-in-new-tab) through the
//! collaborators injected at construction.

use std::fmt;
use std::sync::Arc;

use figshell_common::{Coordinator, TabId};
use tracing::{debug, warn};

use crate::external::ExternalOpener;
use crate::url_rules;

/// Outcome of a will-navigate event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the surface navigate.
    Allow,
    /// Cancel the navigation.
    Suppress,
    /// Cancel and hand the target to the system browser.
    OpenExternal,
    /// The target is the logout page. Sign-out fires; the navigation itself
    /// is cancelled only if a later rule says so.
    SignOut { suppress: bool },
}

impl NavigationDecision {
    /// Whether the surface should go ahead with the navigation.
    pub fn proceeds(self) -> bool {
        matches!(
            self,
            NavigationDecision::Allow | NavigationDecision::SignOut { suppress: false }
        )
    }

    pub fn signs_out(self) -> bool {
        matches!(self, NavigationDecision::SignOut { .. })
    }
}

/// Outcome of an in-page request to open a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewWindowAction {
    /// Drop the request entirely.
    Ignore,
    /// Ask the coordinator for a new tab showing the URL.
    OpenInNewTab(String),
    /// Hand the URL to the system browser.
    OpenExternal(String),
}

/// Classify a navigation from `current` to `target`. First matching rule wins.
pub fn classify_navigation(current: &str, target: &str) -> NavigationDecision {
    if url_rules::is_auth_redeem(target) {
        return NavigationDecision::Allow;
    }

    if target == current {
        return NavigationDecision::Suppress;
    }

    if url_rules::is_doc_link(target) {
        return NavigationDecision::OpenExternal;
    }

    // The login page never navigates in place.
    if url_rules::is_login_page(current) {
        return NavigationDecision::Suppress;
    }

    let signing_out = url_rules::is_logout_page(target);
    let redirected = url_rules::has_redirected_marker(target);

    match (signing_out, redirected) {
        (true, suppress) => NavigationDecision::SignOut { suppress },
        (false, true) => NavigationDecision::Suppress,
        (false, false) => NavigationDecision::Allow,
    }
}

/// Classify a new-window request for `url`.
pub fn classify_new_window(url: &str) -> NewWindowAction {
    if url_rules::is_sso_start(url) {
        return NewWindowAction::Ignore;
    }

    if url_rules::is_prototype_url(url) || url_rules::is_valid_project_link(url) {
        return NewWindowAction::OpenInNewTab(url.to_string());
    }

    NewWindowAction::OpenExternal(url.to_string())
}

/// Per-tab policy enforcer. Cheap to clone so the host's event callbacks
/// can each hold one.
#[derive(Clone)]
pub struct Gatekeeper {
    tab_id: TabId,
    coordinator: Arc<dyn Coordinator>,
    opener: Arc<dyn ExternalOpener>,
}

impl fmt::Debug for Gatekeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("tab_id", &self.tab_id)
            .finish_non_exhaustive()
    }
}

impl Gatekeeper {
    pub fn new(
        tab_id: TabId,
        coordinator: Arc<dyn Coordinator>,
        opener: Arc<dyn ExternalOpener>,
    ) -> Self {
        Self {
            tab_id,
            coordinator,
            opener,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn coordinator(&self) -> &Arc<dyn Coordinator> {
        &self.coordinator
    }

    /// Decide a will-navigate event and perform its side effects.
    pub fn will_navigate(&self, current: &str, target: &str) -> NavigationDecision {
        let decision = classify_navigation(current, target);
        debug!(tab_id = %self.tab_id, current, target, ?decision, "will-navigate");

        match decision {
            NavigationDecision::OpenExternal => self.open_external(target),
            NavigationDecision::SignOut { .. } => self.coordinator.notify_sign_out(),
            NavigationDecision::Allow | NavigationDecision::Suppress => {}
        }

        decision
    }

    /// Decide a new-window request and perform its side effects.
    pub fn new_window(&self, url: &str) -> NewWindowAction {
        let action = classify_new_window(url);
        debug!(tab_id = %self.tab_id, url, ?action, "new window requested");

        match &action {
            NewWindowAction::Ignore => {}
            NewWindowAction::OpenInNewTab(url) => self.coordinator.notify_open_in_new_tab(url),
            NewWindowAction::OpenExternal(url) => self.open_external(url),
        }

        action
    }

    /// Open `url` in the system browser, logging failures.
    pub fn open_external(&self, url: &str) {
        if let Err(e) = self.opener.open(url) {
            warn!(tab_id = %self.tab_id, url, error = %e, "external open failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingCoordinator, RecordingOpener};

    const FILES: &str = "https://www.figma.com/files/recent";
    const LOGIN: &str = "https://www.figma.com/login";

    fn gatekeeper() -> (Gatekeeper, Arc<RecordingCoordinator>, Arc<RecordingOpener>) {
        let coordinator = Arc::new(RecordingCoordinator::default());
        let opener = Arc::new(RecordingOpener::default());
        let gk = Gatekeeper::new(TabId(1), coordinator.clone(), opener.clone());
        (gk, coordinator, opener)
    }

    // -- classify_navigation --

    #[test]
    fn same_url_is_suppressed() {
        for url in [
            FILES,
            "https://www.figma.com/file/abc/Design?node-id=1",
            "https://example.com/",
            "not even a url",
        ] {
            assert_eq!(classify_navigation(url, url), NavigationDecision::Suppress);
        }
    }

    #[test]
    fn auth_redeem_is_allowed_from_anywhere() {
        let redeem = "https://www.figma.com/app_auth/9f8e/redeem?g_secret=s";
        assert_eq!(classify_navigation(LOGIN, redeem), NavigationDecision::Allow);
        assert_eq!(classify_navigation(FILES, redeem), NavigationDecision::Allow);
        assert_eq!(classify_navigation(redeem, redeem), NavigationDecision::Allow);
    }

    #[test]
    fn doc_link_opens_externally() {
        assert_eq!(
            classify_navigation(FILES, "https://help.figma.com/hc/en-us"),
            NavigationDecision::OpenExternal
        );
        // Doc links win over the login lock.
        assert_eq!(
            classify_navigation(LOGIN, "https://help.figma.com/hc/en-us"),
            NavigationDecision::OpenExternal
        );
    }

    #[test]
    fn login_page_suppresses_everything_else() {
        for target in [
            FILES,
            "https://www.figma.com/file/abc/Design",
            "https://www.figma.com/logout",
            "https://example.com/",
            "garbage",
        ] {
            assert_eq!(
                classify_navigation(LOGIN, target),
                NavigationDecision::Suppress,
                "target {target}"
            );
        }
        assert_eq!(
            classify_navigation("https://www.figma.com/login?next=%2Ffiles", FILES),
            NavigationDecision::Suppress
        );
    }

    #[test]
    fn logout_signs_out_without_suppressing() {
        let decision = classify_navigation(FILES, "https://www.figma.com/logout");
        assert_eq!(decision, NavigationDecision::SignOut { suppress: false });
        assert!(decision.proceeds());
        assert!(decision.signs_out());
    }

    #[test]
    fn logout_with_redirected_marker_signs_out_and_suppresses() {
        let decision = classify_navigation(FILES, "https://www.figma.com/logout?redirected=1");
        assert_eq!(decision, NavigationDecision::SignOut { suppress: true });
        assert!(!decision.proceeds());
    }

    #[test]
    fn redirected_marker_is_suppressed() {
        assert_eq!(
            classify_navigation(FILES, "https://www.figma.com/files/drafts?redirected=1"),
            NavigationDecision::Suppress
        );
        assert_eq!(
            classify_navigation(FILES, "https://www.figma.com/files?a=b&redirected=1"),
            NavigationDecision::Suppress
        );
    }

    #[test]
    fn ordinary_navigation_is_allowed() {
        let decision = classify_navigation(FILES, "https://www.figma.com/file/abc/Design");
        assert_eq!(decision, NavigationDecision::Allow);
        assert!(decision.proceeds());
        assert!(!decision.signs_out());
    }

    #[test]
    fn malformed_urls_default_to_allow() {
        assert_eq!(
            classify_navigation("::garbage::", "also garbage"),
            NavigationDecision::Allow
        );
        assert_eq!(
            classify_navigation(FILES, "http://[::1"),
            NavigationDecision::Allow
        );
    }

    // -- classify_new_window --

    #[test]
    fn sso_start_window_is_ignored() {
        assert_eq!(
            classify_new_window("https://www.figma.com/start_google_sso?fuid=1"),
            NewWindowAction::Ignore
        );
    }

    #[test]
    fn project_and_prototype_windows_open_in_tabs() {
        let file = "https://www.figma.com/file/abc/Design";
        let proto = "https://www.figma.com/proto/abc/Flow";
        assert_eq!(
            classify_new_window(file),
            NewWindowAction::OpenInNewTab(file.into())
        );
        assert_eq!(
            classify_new_window(proto),
            NewWindowAction::OpenInNewTab(proto.into())
        );
    }

    #[test]
    fn other_windows_open_externally() {
        for url in ["https://github.com/figshell", "not a url", ""] {
            assert_eq!(
                classify_new_window(url),
                NewWindowAction::OpenExternal(url.into())
            );
        }
    }

    // -- Gatekeeper side effects --

    #[test]
    fn gatekeeper_emits_sign_out_once_per_attempt() {
        let (gk, coordinator, opener) = gatekeeper();

        let decision = gk.will_navigate(FILES, "https://www.figma.com/logout");
        assert!(decision.proceeds());
        assert_eq!(coordinator.sign_outs(), 1);

        gk.will_navigate(FILES, "https://www.figma.com/logout");
        assert_eq!(coordinator.sign_outs(), 2);
        assert!(opener.opened().is_empty());
    }

    #[test]
    fn gatekeeper_opens_doc_links_externally() {
        let (gk, coordinator, opener) = gatekeeper();
        let doc = "https://www.figma.com/developers/api";

        let decision = gk.will_navigate(FILES, doc);
        assert!(!decision.proceeds());
        assert_eq!(opener.opened(), vec![doc.to_string()]);
        assert_eq!(coordinator.sign_outs(), 0);
    }

    #[test]
    fn gatekeeper_suppression_has_no_side_effects() {
        let (gk, coordinator, opener) = gatekeeper();
        gk.will_navigate(LOGIN, FILES);
        gk.will_navigate(FILES, FILES);
        assert_eq!(coordinator.sign_outs(), 0);
        assert!(coordinator.new_tabs().is_empty());
        assert!(opener.opened().is_empty());
    }

    #[test]
    fn gatekeeper_sso_window_does_nothing() {
        let (gk, coordinator, opener) = gatekeeper();
        gk.new_window("https://www.figma.com/start_google_sso");
        assert!(coordinator.new_tabs().is_empty());
        assert!(opener.opened().is_empty());
    }

    #[test]
    fn gatekeeper_project_window_emits_one_new_tab() {
        let (gk, coordinator, opener) = gatekeeper();
        let file = "https://www.figma.com/file/abc/Design";
        gk.new_window(file);
        assert_eq!(coordinator.new_tabs(), vec![file.to_string()]);
        assert!(opener.opened().is_empty());
    }

    #[test]
    fn gatekeeper_other_window_opens_externally() {
        let (gk, coordinator, opener) = gatekeeper();
        gk.new_window("https://github.com/figshell");
        assert!(coordinator.new_tabs().is_empty());
        assert_eq!(opener.opened(), vec!["https://github.com/figshell".to_string()]);
    }

    #[test]
    fn gatekeeper_swallows_opener_failure() {
        let coordinator = Arc::new(RecordingCoordinator::default());
        let opener = Arc::new(RecordingOpener::failing());
        let gk = Gatekeeper::new(TabId(9), coordinator, opener.clone());

        let action = gk.new_window("https://github.com/figshell");
        assert!(matches!(action, NewWindowAction::OpenExternal(_)));
        assert_eq!(opener.opened().len(), 1);
    }
}
