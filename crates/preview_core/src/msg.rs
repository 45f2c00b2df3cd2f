use std::time::Instant;

use url::Url;

use crate::{Link, LinkId, PreviewData};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A page finished loading, either initially or after a client-side transition.
    /// Pages without the content container leave the controller detached.
    PageReady { page: Url, has_content: bool },
    /// Pointer entered an anchor inside the content area.
    LinkEntered { link: Link, now: Instant },
    /// Pointer left an anchor inside the content area.
    LinkLeft { link: LinkId, now: Instant },
    /// Pointer entered the tooltip.
    TooltipEntered,
    /// Pointer left the tooltip.
    TooltipLeft { now: Instant },
    /// Clock tick; fires any debounce timer whose deadline has passed.
    Tick { now: Instant },
    /// A fetch issued for `link` completed. `None` means nothing usable.
    PreviewResolved {
        link: LinkId,
        url: String,
        preview: Option<PreviewData>,
        now: Instant,
    },
    NoOp,
}
