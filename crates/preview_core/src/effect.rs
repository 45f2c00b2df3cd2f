use crate::{LinkId, Rect, TooltipContent};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch and extract `url` on behalf of `link`.
    FetchPreview { link: LinkId, url: String },
    /// Replace the tooltip body, position it against `anchor` and make it visible.
    ShowTooltip {
        content: TooltipContent,
        anchor: Rect,
    },
    HideTooltip,
}
