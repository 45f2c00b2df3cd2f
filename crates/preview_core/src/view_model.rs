use crate::{LinkId, TooltipPhase};

/// Where the most recent hover sits in the `idle → pending → loading → shown` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverPhase {
    #[default]
    Idle,
    Pending { link: LinkId },
    Loading { link: LinkId },
    Shown { link: LinkId },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerView {
    pub attached: bool,
    pub phase: HoverPhase,
    pub tooltip: TooltipPhase,
    pub active_link: Option<LinkId>,
    pub hide_pending: bool,
    pub cached_urls: usize,
    pub in_flight: usize,
}
