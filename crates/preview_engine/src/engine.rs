use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use preview_logging::{preview_debug, preview_error, preview_warn};

use crate::decode::decode_page;
use crate::extract::{DocPageExtractor, ExtractError, ExtractSettings, Extractor};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{EngineEvent, FailureKind, FetchError, RequestId};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub fetch: FetchSettings,
    pub extract: ExtractSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[source] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("failed to start preview runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

enum EngineCommand {
    Resolve { request: RequestId, url: String },
}

/// Background worker that turns preview requests into [`EngineEvent`]s.
///
/// Requests run concurrently on a tokio runtime owned by a dedicated thread and
/// complete in whatever order the network allows. Nothing is ever cancelled, and
/// every accepted request produces exactly one `PreviewResolved`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(settings.fetch).map_err(EngineError::Client)?;
        let extractor = DocPageExtractor::new(settings.extract)?;
        Self::with_parts(Arc::new(fetcher), Arc::new(extractor))
    }

    pub fn with_parts(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker_tx = event_tx.clone();
        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let EngineCommand::Resolve { request, url } = command;
                let fetcher = fetcher.clone();
                let extractor = extractor.clone();
                let event_tx = worker_tx.clone();
                runtime.spawn(async move {
                    let task = tokio::spawn({
                        let url = url.clone();
                        async move {
                            resolve_preview(fetcher.as_ref(), extractor.as_ref(), request, url)
                                .await
                        }
                    });
                    let event = match task.await {
                        Ok(event) => event,
                        Err(err) => {
                            preview_error!("Preview task for {} did not finish: {}", url, err);
                            aborted(request, url)
                        }
                    };
                    if event_tx.send(event).is_err() {
                        preview_debug!("Engine handle dropped before request {} finished", request);
                    }
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx,
        })
    }

    /// Queues a preview. If the worker is gone the request resolves at once as aborted.
    pub fn request(&self, request: RequestId, url: impl Into<String>) {
        let command = EngineCommand::Resolve {
            request,
            url: url.into(),
        };
        if let Err(mpsc::SendError(EngineCommand::Resolve { request, url })) =
            self.cmd_tx.send(command)
        {
            preview_error!("Preview worker stopped; dropping request for {}", url);
            let _ = self.event_tx.send(aborted(request, url));
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn aborted(request: RequestId, url: String) -> EngineEvent {
    EngineEvent::PreviewResolved {
        request,
        url,
        preview: None,
        failure: Some(FailureKind::Aborted),
    }
}

/// Fetches, decodes and extracts one page. Every failure degrades to "no preview".
pub async fn resolve_preview(
    fetcher: &dyn Fetcher,
    extractor: &dyn Extractor,
    request: RequestId,
    url: String,
) -> EngineEvent {
    let (preview, failure) = match fetcher.fetch(&url).await {
        Ok(output) => {
            let content_type = output.metadata.content_type.as_deref();
            match decode_page(&output.bytes, content_type) {
                Ok(html) => {
                    let preview = extractor.extract(&html, &url);
                    match &preview {
                        Some(_) => preview_debug!(
                            "Extracted preview from {} ({} bytes)",
                            output.metadata.final_url,
                            output.metadata.byte_len
                        ),
                        None => {
                            preview_debug!("No content container in {}", output.metadata.final_url)
                        }
                    }
                    (preview, None)
                }
                Err(err) => {
                    preview_warn!("Could not decode {}: {}", url, err);
                    (None, Some(FailureKind::Decode))
                }
            }
        }
        Err(err) => {
            preview_warn!("Preview fetch of {} failed: {}", url, err);
            (None, Some(err.kind))
        }
    };

    EngineEvent::PreviewResolved {
        request,
        url,
        preview,
        failure,
    }
}
