use std::io::Write;

use preview_core::{Placement, Viewport};
use preview_logging::preview_warn;

/// The floating tooltip element as seen by the host.
pub trait TooltipSurface {
    fn set_markup(&mut self, markup: &str);
    /// Height of the tooltip with its current markup, if the surface can measure it.
    fn rendered_height(&self) -> Option<f64>;
    fn viewport(&self) -> Viewport;
    fn set_viewport(&mut self, viewport: Viewport);
    fn place(&mut self, placement: Placement);
    fn set_visible(&mut self, visible: bool);
}

/// Prints tooltip changes as text lines.
pub struct TerminalSurface<W: Write> {
    out: W,
    viewport: Viewport,
    markup: String,
    placement: Option<Placement>,
    visible: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, viewport: Viewport) -> Self {
        Self {
            out,
            viewport,
            markup: String::new(),
            placement: None,
            visible: false,
        }
    }

    fn emit(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            preview_warn!("Tooltip output failed: {}", err);
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TooltipSurface for TerminalSurface<W> {
    fn set_markup(&mut self, markup: &str) {
        self.markup = markup.to_string();
    }

    fn rendered_height(&self) -> Option<f64> {
        None
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn place(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }

    fn set_visible(&mut self, visible: bool) {
        if visible {
            let Some(placement) = self.placement else {
                return;
            };
            let side = if placement.above { "above" } else { "below" };
            let line = format!(
                "tooltip {side} link at ({:.0}, {:.0}): {}",
                placement.left, placement.top, self.markup
            );
            self.emit(&line);
        } else if self.visible {
            self.emit("tooltip hidden");
        }
        self.visible = visible;
    }
}
