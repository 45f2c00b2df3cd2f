//! Link preview engine: page fetching, decoding and extraction.
mod decode;
mod engine;
mod excerpt;
mod extract;
mod fetch;
mod types;

pub use decode::{decode_page, DecodeError};
pub use engine::{resolve_preview, EngineError, EngineHandle, EngineSettings};
pub use excerpt::{
    collapse_whitespace, strip_permalink, truncate_at_word, ELLIPSIS, PERMALINK_MARKER,
};
pub use extract::{DocPageExtractor, ExtractError, ExtractSettings, Extractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, PagePreview, RequestId,
};
