#![deny(missing_docs)]
//! Shared logging utilities for the link preview workspace.
//!
//! Every crate logs through the `preview_*` macros so records carry the
//! common [`TARGET`] and can be filtered as one unit by the host logger.

/// Log target shared by all link preview crates.
pub const TARGET: &str = "link_preview";

/// Logs a trace-level message under the shared target.
#[macro_export]
macro_rules! preview_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the shared target.
#[macro_export]
macro_rules! preview_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the shared target.
#[macro_export]
macro_rules! preview_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the shared target.
#[macro_export]
macro_rules! preview_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the shared target.
#[macro_export]
macro_rules! preview_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for unit and integration tests.
///
/// Safe to call from every test: it no-ops once a logger is installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str(TARGET)
        .build();

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
