use std::time::Instant;

use preview_core::{position_tooltip, Effect, Msg, PlacementSettings, PreviewData};
use preview_engine::{EngineEvent, EngineHandle, PagePreview};
use preview_logging::{preview_debug, preview_info};

use super::surface::TooltipSurface;

/// Executes controller effects against the engine and the tooltip surface.
pub struct EffectRunner {
    engine: EngineHandle,
    placement: PlacementSettings,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, placement: PlacementSettings) -> Self {
        Self { engine, placement }
    }

    pub fn apply(&self, effects: Vec<Effect>, surface: &mut dyn TooltipSurface) {
        for effect in effects {
            match effect {
                Effect::FetchPreview { link, url } => {
                    preview_info!("FetchPreview link={} url={}", link, url);
                    self.engine.request(link, url);
                }
                other => present(other, surface, &self.placement),
            }
        }
    }

    /// Collects finished fetches as controller messages.
    pub fn drain(&self, now: Instant) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            match event {
                EngineEvent::PreviewResolved {
                    request,
                    url,
                    preview,
                    failure,
                } => {
                    if let Some(kind) = failure {
                        preview_debug!("Preview of {} unavailable: {}", url, kind);
                    }
                    msgs.push(Msg::PreviewResolved {
                        link: request,
                        url,
                        preview: preview.map(map_preview),
                        now,
                    });
                }
            }
        }
        msgs
    }
}

/// Applies a tooltip effect: render, measure, position, then reveal.
pub fn present(effect: Effect, surface: &mut dyn TooltipSurface, placement: &PlacementSettings) {
    match effect {
        Effect::ShowTooltip { content, anchor } => {
            surface.set_markup(&content.to_markup());
            let at = position_tooltip(
                anchor,
                surface.rendered_height(),
                surface.viewport(),
                placement,
            );
            surface.place(at);
            surface.set_visible(true);
        }
        Effect::HideTooltip => surface.set_visible(false),
        Effect::FetchPreview { .. } => {}
    }
}

fn map_preview(preview: PagePreview) -> PreviewData {
    PreviewData {
        title: preview.title,
        excerpt: preview.excerpt,
        sections: preview.sections,
    }
}
