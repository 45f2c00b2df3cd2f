/// Axis-aligned box in viewport coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Top-left corner of the tooltip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub above: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSettings {
    /// Assumed tooltip width used for horizontal clamping.
    pub tooltip_width: f64,
    /// Height used when the surface cannot report one.
    pub fallback_height: f64,
    /// Minimum distance to the left and right viewport edges.
    pub edge_margin: f64,
    /// Gap between the link and the tooltip.
    pub anchor_gap: f64,
    /// Space kept free at the viewport bottom before flipping above.
    pub bottom_margin: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            tooltip_width: 320.0,
            fallback_height: 150.0,
            edge_margin: 8.0,
            anchor_gap: 8.0,
            bottom_margin: 16.0,
        }
    }
}

/// Places the tooltip under `anchor`, or above it when there is no room below.
///
/// `rendered_height` is the tooltip's current height; `None` or zero falls back to
/// the configured height. When the viewport is narrower than the tooltip plus both
/// margins, the right margin wins and the tooltip may start off-screen.
pub fn position_tooltip(
    anchor: Rect,
    rendered_height: Option<f64>,
    viewport: Viewport,
    settings: &PlacementSettings,
) -> Placement {
    let width = settings.tooltip_width;
    let height = rendered_height
        .filter(|h| *h > 0.0)
        .unwrap_or(settings.fallback_height);

    let mut top = anchor.bottom() + settings.anchor_gap;
    let mut above = false;
    if top + height > viewport.height - settings.bottom_margin {
        top = anchor.top - height - settings.anchor_gap;
        above = true;
    }

    let mut left = anchor.center_x() - width / 2.0;
    if left < settings.edge_margin {
        left = settings.edge_margin;
    }
    let max_left = viewport.width - width - settings.edge_margin;
    if left > max_left {
        left = max_left;
    }

    Placement { left, top, above }
}
