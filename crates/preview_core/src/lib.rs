//! Link preview core: pure hover/tooltip state machine and its helpers.
mod cache;
mod effect;
mod link;
mod markup;
mod msg;
mod position;
mod settings;
mod state;
mod timer;
mod update;
mod view_model;

pub use cache::{CacheEntry, CachePolicy, PreviewCache};
pub use effect::Effect;
pub use link::{is_previewable, preview_key, resolve_href, Link, LinkId};
pub use markup::{escape_html, PreviewData, TooltipContent};
pub use msg::Msg;
pub use position::{position_tooltip, Placement, PlacementSettings, Rect, Viewport};
pub use settings::PreviewSettings;
pub use state::{PreviewController, TooltipPhase};
pub use timer::Debounce;
pub use update::update;
pub use view_model::{ControllerView, HoverPhase};

pub use url::Url;
