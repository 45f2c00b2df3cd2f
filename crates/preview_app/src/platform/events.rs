use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use preview_core::{LinkId, Rect, Url, Viewport};
use preview_logging::preview_warn;

/// Something that happened on the hosting page.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Initial load or a client-side page swap.
    PageReady { page: Url, has_content: bool },
    LinkEnter { id: LinkId, href: String, rect: Rect },
    LinkLeave { id: LinkId },
    TooltipEnter,
    TooltipLeave,
    Resize(Viewport),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    Event(HostEvent),
    Idle,
    Closed,
}

/// Source of page notifications the controller is subscribed to.
pub trait PageEvents {
    /// Waits at most `timeout` for the next event.
    fn poll(&mut self, timeout: Duration) -> Poll;
}

/// Reads one event per line from stdin on a helper thread.
///
/// ```text
/// page https://docs.example.com/guide/ [no-content]
/// enter 3 ../install/ 120 48 64 18
/// leave 3
/// tip-enter | tip-leave
/// viewport 1280 800
/// quit
/// ```
pub struct StdinEvents {
    rx: mpsc::Receiver<HostEvent>,
}

impl StdinEvents {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_line(&line) {
                    Ok(Some(event)) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => preview_warn!("Ignoring input line {:?}: {:#}", line, err),
                }
            }
        });
        Self { rx }
    }
}

impl PageEvents for StdinEvents {
    fn poll(&mut self, timeout: Duration) -> Poll {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Poll::Event(event),
            Err(RecvTimeoutError::Timeout) => Poll::Idle,
            Err(RecvTimeoutError::Disconnected) => Poll::Closed,
        }
    }
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<HostEvent>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    if command.starts_with('#') {
        return Ok(None);
    }
    let args: Vec<&str> = words.collect();

    let event = match (command, args.as_slice()) {
        ("page", [url, rest @ ..]) => {
            let page = Url::parse(url).with_context(|| format!("page url {url:?}"))?;
            let has_content = !rest.contains(&"no-content");
            HostEvent::PageReady { page, has_content }
        }
        ("enter", [id, href]) => HostEvent::LinkEnter {
            id: parse_id(id)?,
            href: href.to_string(),
            rect: Rect::default(),
        },
        ("enter", [id, href, left, top, width, height]) => HostEvent::LinkEnter {
            id: parse_id(id)?,
            href: href.to_string(),
            rect: Rect::new(
                parse_px(left)?,
                parse_px(top)?,
                parse_px(width)?,
                parse_px(height)?,
            ),
        },
        ("leave", [id]) => HostEvent::LinkLeave { id: parse_id(id)? },
        ("tip-enter", []) => HostEvent::TooltipEnter,
        ("tip-leave", []) => HostEvent::TooltipLeave,
        ("viewport", [width, height]) => {
            HostEvent::Resize(Viewport::new(parse_px(width)?, parse_px(height)?))
        }
        ("quit", []) => HostEvent::Quit,
        _ => bail!("unknown command or wrong arguments"),
    };
    Ok(Some(event))
}

fn parse_id(raw: &str) -> anyhow::Result<LinkId> {
    raw.parse()
        .map_err(|err| anyhow!("link id {raw:?}: {err}"))
}

fn parse_px(raw: &str) -> anyhow::Result<f64> {
    let value: f64 = raw
        .trim_end_matches("px")
        .parse()
        .map_err(|err| anyhow!("pixel value {raw:?}: {err}"))?;
    if !value.is_finite() {
        bail!("pixel value {raw:?} is not finite");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_page_lines() {
        assert_eq!(
            parse_line("page https://docs.example.com/guide/").unwrap(),
            Some(HostEvent::PageReady {
                page: Url::parse("https://docs.example.com/guide/").unwrap(),
                has_content: true,
            })
        );
        assert_eq!(
            parse_line("page https://docs.example.com/ no-content").unwrap(),
            Some(HostEvent::PageReady {
                page: Url::parse("https://docs.example.com/").unwrap(),
                has_content: false,
            })
        );
    }

    #[test]
    fn parses_link_geometry() {
        assert_eq!(
            parse_line("enter 3 ../install/ 120 48px 64 18").unwrap(),
            Some(HostEvent::LinkEnter {
                id: 3,
                href: "../install/".into(),
                rect: Rect::new(120.0, 48.0, 64.0, 18.0),
            })
        );
        assert_eq!(
            parse_line("leave 3").unwrap(),
            Some(HostEvent::LinkLeave { id: 3 })
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# hover the install link").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("enter x ../a/").is_err());
        assert!(parse_line("page not-a-url").is_err());
        assert!(parse_line("viewport wide 800").is_err());
        assert!(parse_line("dance").is_err());
    }
}
