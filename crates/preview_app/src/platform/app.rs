use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use preview_core::{update, Link, Msg, PreviewController, PreviewSettings, Viewport};
use preview_engine::EngineHandle;
use preview_logging::{preview_info, preview_warn};

use super::config;
use super::effects::EffectRunner;
use super::events::{HostEvent, PageEvents, Poll, StdinEvents};
use super::logging;
use super::surface::{TerminalSurface, TooltipSurface};

/// Longest wait between checks for engine completions.
const TICK: Duration = Duration::from_millis(25);

pub fn run_app() -> anyhow::Result<()> {
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let loaded = config::load(explicit.as_deref())?;
    logging::initialize(loaded.config.log_destination, loaded.config.log_level);
    if let Some(warning) = &loaded.warning {
        preview_warn!("{}", warning);
    }
    let config = loaded.config;

    let engine = EngineHandle::new(config.engine).context("starting preview engine")?;
    let surface = TerminalSurface::new(std::io::stdout(), Viewport::default());
    let mut host = Host::new(config.preview, engine, surface);
    let mut events = StdinEvents::spawn();

    preview_info!("Link preview host ready; reading page events from stdin");
    loop {
        match events.poll(host.poll_timeout(Instant::now())) {
            Poll::Event(HostEvent::Quit) | Poll::Closed => break,
            Poll::Event(event) => host.handle(event, Instant::now()),
            Poll::Idle => {}
        }
        host.pump(Instant::now());
    }
    preview_info!("Link preview host stopped");
    Ok(())
}

/// One page session: controller, effect runner and tooltip surface on a single thread.
pub struct Host<S: TooltipSurface> {
    controller: Option<PreviewController>,
    runner: EffectRunner,
    surface: S,
}

impl<S: TooltipSurface> Host<S> {
    pub fn new(settings: PreviewSettings, engine: EngineHandle, surface: S) -> Self {
        let runner = EffectRunner::new(engine, settings.placement.clone());
        Self {
            controller: Some(PreviewController::new(settings)),
            runner,
            surface,
        }
    }

    pub fn handle(&mut self, event: HostEvent, now: Instant) {
        let msg = match event {
            HostEvent::PageReady { page, has_content } => Msg::PageReady { page, has_content },
            HostEvent::LinkEnter { id, href, rect } => Msg::LinkEntered {
                link: Link::new(id, href, rect),
                now,
            },
            HostEvent::LinkLeave { id } => Msg::LinkLeft { link: id, now },
            HostEvent::TooltipEnter => Msg::TooltipEntered,
            HostEvent::TooltipLeave => Msg::TooltipLeft { now },
            HostEvent::Resize(viewport) => {
                self.surface.set_viewport(viewport);
                Msg::NoOp
            }
            HostEvent::Quit => Msg::NoOp,
        };
        self.dispatch(msg);
    }

    /// How long the event source may block: until the next debounce deadline, capped at [`TICK`].
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.controller
            .as_ref()
            .and_then(PreviewController::next_deadline)
            .map_or(TICK, |deadline| deadline.saturating_duration_since(now).min(TICK))
    }

    /// Feeds finished fetches and a clock tick into the controller.
    pub fn pump(&mut self, now: Instant) {
        for msg in self.runner.drain(now) {
            self.dispatch(msg);
        }
        self.dispatch(Msg::Tick { now });
    }

    fn dispatch(&mut self, msg: Msg) {
        let Some(controller) = self.controller.take() else {
            return;
        };
        let (controller, effects) = update(controller, msg);
        self.controller = Some(controller);
        self.runner.apply(effects, &mut self.surface);
    }

    #[cfg(test)]
    fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_core::{Placement, Rect, Url};
    use preview_engine::EngineSettings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingSurface {
        markup: String,
        visible: bool,
        shows: usize,
    }

    impl TooltipSurface for RecordingSurface {
        fn set_markup(&mut self, markup: &str) {
            self.markup = markup.to_string();
        }
        fn rendered_height(&self) -> Option<f64> {
            None
        }
        fn viewport(&self) -> Viewport {
            Viewport::default()
        }
        fn set_viewport(&mut self, _viewport: Viewport) {}
        fn place(&mut self, _placement: Placement) {}
        fn set_visible(&mut self, visible: bool) {
            if visible {
                self.shows += 1;
            }
            self.visible = visible;
        }
    }

    const GUIDE_X: &str = "<html><body><div class=\"md-content\">\
        <h1>Guide X\u{b6}</h1><p>Short.</p>\
        <p>This is a sufficiently long paragraph exceeding twenty characters.</p>\
        <h2>Setup</h2></div></body></html>";

    fn wait_for<S: TooltipSurface>(
        host: &mut Host<S>,
        now: Instant,
        done: impl Fn(&S) -> bool,
    ) -> bool {
        for _ in 0..400 {
            host.pump(now);
            if done(host.surface()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn poll_waits_until_the_show_deadline() {
        let engine = EngineHandle::new(EngineSettings::default()).unwrap();
        let mut host = Host::new(PreviewSettings::default(), engine, RecordingSurface::default());
        let t0 = Instant::now();
        assert_eq!(host.poll_timeout(t0), TICK);

        host.handle(
            HostEvent::PageReady {
                page: Url::parse("https://docs.example.com/guide/").unwrap(),
                has_content: true,
            },
            t0,
        );
        host.handle(
            HostEvent::LinkEnter {
                id: 1,
                href: "../install/".into(),
                rect: Rect::default(),
            },
            t0,
        );
        assert_eq!(host.poll_timeout(t0), TICK);
        assert_eq!(
            host.poll_timeout(t0 + Duration::from_millis(290)),
            Duration::from_millis(10)
        );
        assert_eq!(
            host.poll_timeout(t0 + Duration::from_millis(400)),
            Duration::ZERO
        );
    }

    #[test]
    fn hovering_a_guide_link_shows_its_preview() {
        preview_logging::initialize_for_tests();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/guide/x"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_raw(GUIDE_X, "text/html; charset=utf-8"),
                )
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let engine = EngineHandle::new(EngineSettings::default()).unwrap();
        let mut host = Host::new(PreviewSettings::default(), engine, RecordingSurface::default());
        let page = Url::parse(&format!("{}/index.html", server.uri())).unwrap();
        let t0 = Instant::now();
        host.handle(
            HostEvent::PageReady {
                page,
                has_content: true,
            },
            t0,
        );

        let rect = Rect::new(40.0, 120.0, 60.0, 18.0);
        host.handle(
            HostEvent::LinkEnter {
                id: 1,
                href: "/guide/x".into(),
                rect,
            },
            t0,
        );
        host.pump(t0 + Duration::from_millis(299));
        assert!(!host.surface().visible);

        let shown_at = t0 + Duration::from_millis(300);
        host.pump(shown_at);
        assert!(host.surface().markup.contains("link-preview-loading"));

        assert!(wait_for(&mut host, shown_at, |s| s.markup.contains("link-preview-title")));
        let markup = &host.surface().markup;
        assert!(markup.contains("<div class=\"link-preview-title\">Guide X</div>"));
        assert!(markup.contains(
            "This is a sufficiently long paragraph exceeding twenty characters."
        ));
        assert!(markup.contains("<span class=\"link-preview-section\"># Setup</span>"));

        // Leave, come back: served from the cache, still one request.
        let later = shown_at + Duration::from_secs(1);
        host.handle(HostEvent::LinkLeave { id: 1 }, later);
        host.pump(later + Duration::from_millis(200));
        assert!(!host.surface().visible);
        host.handle(
            HostEvent::LinkEnter {
                id: 1,
                href: "/guide/x".into(),
                rect,
            },
            later + Duration::from_millis(300),
        );
        host.pump(later + Duration::from_millis(600));
        assert!(host.surface().visible);
        assert!(host.surface().markup.contains("Guide X"));
        assert_eq!(host.surface().shows, 3);

        runtime.block_on(server.verify());
    }
}
