use std::collections::HashSet;
use std::time::Instant;

use url::Url;

use crate::timer::Debounce;
use crate::view_model::{ControllerView, HoverPhase};
use crate::{CacheEntry, Link, LinkId, PreviewCache, PreviewSettings};

/// What the tooltip element currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipPhase {
    #[default]
    Hidden,
    Loading { link: LinkId },
    Shown { link: LinkId },
}

impl TooltipPhase {
    pub fn is_visible(self) -> bool {
        !matches!(self, TooltipPhase::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ActiveLink {
    pub(crate) link: Link,
    /// Fragment-free absolute URL used for the cache and the fetch.
    pub(crate) key: String,
}

/// Hover preview controller for one browsing session.
///
/// Owns the session cache, the two debounce timers and the tooltip lifecycle.
/// Advanced only through [`crate::update`].
#[derive(Debug, Clone)]
pub struct PreviewController {
    /// Current page; `None` while detached.
    pub(crate) page: Option<Url>,
    pub(crate) cache: PreviewCache,
    pub(crate) in_flight: HashSet<String>,
    pub(crate) show_timer: Debounce<Link>,
    pub(crate) hide_timer: Debounce<()>,
    pub(crate) active: Option<ActiveLink>,
    pub(crate) tooltip: TooltipPhase,
}

impl PreviewController {
    pub fn new(settings: PreviewSettings) -> Self {
        Self {
            cache: PreviewCache::new(settings.cache),
            in_flight: HashSet::new(),
            show_timer: Debounce::new(settings.show_delay),
            hide_timer: Debounce::new(settings.hide_delay),
            page: None,
            active: None,
            tooltip: TooltipPhase::Hidden,
        }
    }

    pub fn cached(&self, url: &str, now: Instant) -> Option<&CacheEntry> {
        self.cache.get(url, now)
    }

    /// Earliest pending timer deadline; hosts sleep at most until then before ticking.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.show_timer.deadline(), self.hide_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn view(&self) -> ControllerView {
        let phase = match (self.show_timer.payload(), self.tooltip) {
            (Some(link), _) => HoverPhase::Pending { link: link.id },
            (None, TooltipPhase::Loading { link }) => HoverPhase::Loading { link },
            (None, TooltipPhase::Shown { link }) => HoverPhase::Shown { link },
            (None, TooltipPhase::Hidden) => HoverPhase::Idle,
        };
        ControllerView {
            attached: self.page.is_some(),
            phase,
            tooltip: self.tooltip,
            active_link: self.active.as_ref().map(|active| active.link.id),
            hide_pending: self.hide_timer.is_armed(),
            cached_urls: self.cache.len(),
            in_flight: self.in_flight.len(),
        }
    }
}

impl Default for PreviewController {
    fn default() -> Self {
        Self::new(PreviewSettings::default())
    }
}
