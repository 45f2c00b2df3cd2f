use std::time::Instant;

use preview_logging::{preview_debug, preview_info, preview_trace};

use crate::state::ActiveLink;
use crate::{
    is_previewable, preview_key, CacheEntry, Effect, Link, Msg, PreviewController, TooltipContent,
    TooltipPhase,
};

/// Pure update function: applies a message to the controller and returns any effects.
pub fn update(mut controller: PreviewController, msg: Msg) -> (PreviewController, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::PageReady { page, has_content } => {
            controller.show_timer.cancel();
            controller.hide_timer.cancel();
            hide(&mut controller, &mut effects);
            if has_content {
                preview_info!("Attached to page {}", page);
                controller.page = Some(page);
            } else {
                preview_info!("Page {} has no content area; previews disabled", page);
                controller.page = None;
            }
        }
        Msg::LinkEntered { link, now } => {
            let Some(page) = controller.page.as_ref() else {
                return (controller, effects);
            };
            if !is_previewable(&link.href, page) {
                preview_trace!("Ignoring non-previewable href {:?}", link.href);
                return (controller, effects);
            }
            controller.hide_timer.cancel();
            let already_active = controller
                .active
                .as_ref()
                .is_some_and(|active| active.link.id == link.id);
            if !already_active {
                controller.show_timer.arm(now, link);
            }
        }
        Msg::LinkLeft { link, now } => {
            if controller.page.is_some() {
                if controller.show_timer.cancel().is_some() {
                    preview_trace!("Hover on link {} abandoned before preview", link);
                }
                controller.hide_timer.arm(now, ());
            }
        }
        Msg::TooltipEntered => {
            controller.hide_timer.cancel();
        }
        Msg::TooltipLeft { now } => {
            if controller.page.is_some() {
                controller.hide_timer.arm(now, ());
            }
        }
        Msg::Tick { now } => fire_due_timers(&mut controller, now, &mut effects),
        Msg::PreviewResolved {
            link,
            url,
            preview,
            now,
        } => {
            controller.in_flight.remove(&url);
            let entry = CacheEntry::from_preview(preview);
            controller.cache.insert(url.clone(), entry.clone(), now);

            let loading = matches!(controller.tooltip, TooltipPhase::Loading { .. });
            let target = controller
                .active
                .as_ref()
                .filter(|active| loading && active.key == url)
                .map(|active| active.link.clone());
            let Some(target) = target else {
                preview_debug!("Discarding stale preview of {} for link {}", url, link);
                return (controller, effects);
            };
            match entry {
                CacheEntry::Ready(data) => {
                    controller.tooltip = TooltipPhase::Shown { link: target.id };
                    effects.push(Effect::ShowTooltip {
                        content: TooltipContent::Preview(data),
                        anchor: target.rect,
                    });
                }
                CacheEntry::Unavailable => hide(&mut controller, &mut effects),
            }
        }
        Msg::NoOp => {}
    }

    (controller, effects)
}

fn fire_due_timers(controller: &mut PreviewController, now: Instant, effects: &mut Vec<Effect>) {
    let show_due = controller.show_timer.deadline().filter(|due| *due <= now);
    let hide_due = controller.hide_timer.deadline().filter(|due| *due <= now);

    let hide_first = match (show_due, hide_due) {
        (Some(show), Some(hide)) => hide <= show,
        _ => true,
    };
    if hide_first && controller.hide_timer.take_due(now).is_some() {
        hide(controller, effects);
    }
    if let Some(link) = controller.show_timer.take_due(now) {
        show_preview(controller, link, now, effects);
    }
    if controller.hide_timer.take_due(now).is_some() {
        hide(controller, effects);
    }
}

fn show_preview(
    controller: &mut PreviewController,
    link: Link,
    now: Instant,
    effects: &mut Vec<Effect>,
) {
    let Some(key) = controller
        .page
        .as_ref()
        .and_then(|page| preview_key(&link.href, page))
    else {
        return;
    };
    controller.active = Some(ActiveLink {
        link: link.clone(),
        key: key.clone(),
    });

    match controller.cache.get(&key, now).cloned() {
        Some(CacheEntry::Ready(data)) => {
            preview_debug!("Cache hit for {}", key);
            controller.tooltip = TooltipPhase::Shown { link: link.id };
            effects.push(Effect::ShowTooltip {
                content: TooltipContent::Preview(data),
                anchor: link.rect,
            });
        }
        Some(CacheEntry::Unavailable) => {
            preview_debug!("No preview available for {}", key);
            if controller.tooltip.is_visible() {
                effects.push(Effect::HideTooltip);
            }
            controller.tooltip = TooltipPhase::Hidden;
        }
        None => {
            controller.tooltip = TooltipPhase::Loading { link: link.id };
            effects.push(Effect::ShowTooltip {
                content: TooltipContent::Loading,
                anchor: link.rect,
            });
            if controller.in_flight.insert(key.clone()) {
                preview_debug!("Fetching preview of {} for link {}", key, link.id);
                effects.push(Effect::FetchPreview {
                    link: link.id,
                    url: key,
                });
            }
        }
    }
}

fn hide(controller: &mut PreviewController, effects: &mut Vec<Effect>) {
    controller.active = None;
    if controller.tooltip.is_visible() {
        effects.push(Effect::HideTooltip);
    }
    controller.tooltip = TooltipPhase::Hidden;
}
