use std::time::Duration;

use crate::{CachePolicy, PlacementSettings};

/// Tunables for the hover controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    /// Hover time before a preview is shown.
    pub show_delay: Duration,
    /// Grace period after the pointer leaves a link or the tooltip.
    pub hide_delay: Duration,
    pub cache: CachePolicy,
    pub placement: PlacementSettings,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(300),
            hide_delay: Duration::from_millis(200),
            cache: CachePolicy::default(),
            placement: PlacementSettings::default(),
        }
    }
}
