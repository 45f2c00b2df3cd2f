mod app;
mod config;
mod effects;
mod events;
mod logging;
mod surface;

pub use app::run_app;
