//! URL shape predicates used by the gatekeeper.
//!
//! Every predicate takes the raw URL string. Anything that fails to parse
//! simply does not match; no predicate panics or returns an error.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static AUTH_REDEEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"figma\.com/app_auth/.+/redeem").unwrap());

static DOC_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(help\.figma\.com/|(www\.)?figma\.com/(developers|plugin-docs|widget-docs|community/plugin-docs)([/?#]|$))",
    )
    .unwrap()
});

static PROTOTYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"figma\.com/proto/").unwrap());

static PROJECT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?figma\.com/(file|design|board|slides)/[^/?#]+").unwrap()
});

static REDIRECTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]redirected=1").unwrap());

static FIGMA_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(figma://|https?://w{0,3}?\.?figma\.com)").unwrap());

/// Substring marking the start of a Google single sign-on flow.
pub const SSO_START_MARKER: &str = "start_google_sso";

/// App-internal authentication completion link.
pub fn is_auth_redeem(url: &str) -> bool {
    AUTH_REDEEM_RE.is_match(url)
}

/// Help-center and developer documentation, meant for the system browser.
pub fn is_doc_link(url: &str) -> bool {
    DOC_LINK_RE.is_match(url)
}

pub fn is_sso_start(url: &str) -> bool {
    url.contains(SSO_START_MARKER)
}

pub fn is_prototype_url(url: &str) -> bool {
    PROTOTYPE_RE.is_match(url)
}

/// A link to a design file, board or slide deck.
pub fn is_valid_project_link(url: &str) -> bool {
    PROJECT_LINK_RE.is_match(url)
}

/// Any URL the shell is willing to host in a tab.
pub fn is_figma_url(url: &str) -> bool {
    FIGMA_URL_RE.is_match(url)
}

/// Query string carries the `redirected=1` marker.
pub fn has_redirected_marker(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .query()
            .is_some_and(|q| REDIRECTED_RE.is_match(&format!("?{q}"))),
        Err(_) => false,
    }
}

/// The path as written in `url`, without dot-segment resolution.
/// `None` if `url` does not parse.
fn raw_path(url: &str) -> Option<&str> {
    Url::parse(url).ok()?;
    let after_scheme = &url[url.find(':')? + 1..];
    let rest = match after_scheme.strip_prefix("//") {
        Some(authority) => &authority[authority.find(['/', '?', '#']).unwrap_or(authority.len())..],
        None => after_scheme,
    };
    let path = &rest[..rest.find(['?', '#']).unwrap_or(rest.len())];
    Some(if path.is_empty() { "/" } else { path })
}

/// The path component, exactly as written, equals `path`.
pub fn path_is(url: &str, path: &str) -> bool {
    raw_path(url) == Some(path)
}

pub fn is_login_page(url: &str) -> bool {
    path_is(url, "/login")
}

pub fn is_logout_page(url: &str) -> bool {
    path_is(url, "/logout")
}
