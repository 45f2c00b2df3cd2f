use url::Url;

use crate::Rect;

/// Host-assigned identity of an anchor element on the current page.
pub type LinkId = u64;

/// Snapshot of a hovered anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    /// Raw `href` attribute as written in the page.
    pub href: String,
    /// Bounding box of the anchor at hover time, in viewport coordinates.
    pub rect: Rect,
}

impl Link {
    pub fn new(id: LinkId, href: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            href: href.into(),
            rect,
        }
    }
}

/// Returns true when `href`, seen from `page`, points at another document on the same host.
///
/// Fragment-only hrefs, other hosts, the current path and anything that does not
/// resolve to a URL are rejected.
pub fn is_previewable(href: &str, page: &Url) -> bool {
    if href.trim_start().starts_with('#') {
        return false;
    }
    let Some(target) = resolve_href(href, page) else {
        return false;
    };
    if target.host_str() != page.host_str() || target.host_str().is_none() {
        return false;
    }
    target.path() != page.path()
}

/// Resolves a raw href against the current page.
pub fn resolve_href(href: &str, page: &Url) -> Option<Url> {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return None;
    }
    page.join(trimmed).ok()
}

/// Cache and fetch key for a link: the absolute URL without its fragment.
pub fn preview_key(href: &str, page: &Url) -> Option<String> {
    let mut url = resolve_href(href, page)?;
    url.set_fragment(None);
    Some(url.into())
}
