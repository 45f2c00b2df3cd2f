use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use preview_core::{CachePolicy, PreviewSettings};
use preview_engine::EngineSettings;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "link_preview.ron";

/// On-disk configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedConfig {
    pub show_delay_ms: u64,
    pub hide_delay_ms: u64,
    pub cache_max_entries: Option<usize>,
    pub cache_ttl_secs: Option<u64>,
    pub content_selector: String,
    pub excerpt_max_chars: usize,
    pub max_sections: usize,
    pub request_timeout_ms: u64,
    pub log_to_file: bool,
    pub verbose: bool,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        let preview = PreviewSettings::default();
        let engine = EngineSettings::default();
        Self {
            show_delay_ms: preview.show_delay.as_millis() as u64,
            hide_delay_ms: preview.hide_delay.as_millis() as u64,
            cache_max_entries: None,
            cache_ttl_secs: None,
            content_selector: engine.extract.content_selector,
            excerpt_max_chars: engine.extract.excerpt_max_chars,
            max_sections: engine.extract.max_sections,
            request_timeout_ms: engine.fetch.request_timeout.as_millis() as u64,
            log_to_file: false,
            verbose: false,
        }
    }
}

/// Settings for every part of the host, derived from [`PersistedConfig`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub preview: PreviewSettings,
    pub engine: EngineSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl From<PersistedConfig> for AppConfig {
    fn from(persisted: PersistedConfig) -> Self {
        let mut engine = EngineSettings::default();
        engine.extract.content_selector = persisted.content_selector;
        engine.extract.excerpt_max_chars = persisted.excerpt_max_chars;
        engine.extract.max_sections = persisted.max_sections;
        engine.fetch.request_timeout = Duration::from_millis(persisted.request_timeout_ms);

        let preview = PreviewSettings {
            show_delay: Duration::from_millis(persisted.show_delay_ms),
            hide_delay: Duration::from_millis(persisted.hide_delay_ms),
            cache: CachePolicy {
                max_entries: persisted.cache_max_entries,
                ttl: persisted.cache_ttl_secs.map(Duration::from_secs),
            },
            ..PreviewSettings::default()
        };

        Self {
            preview,
            engine,
            log_destination: if persisted.log_to_file {
                LogDestination::Both
            } else {
                LogDestination::Terminal
            },
            log_level: if persisted.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        }
    }
}

/// Result of reading the configuration, with any problem that was worked around.
///
/// The warning is returned rather than logged because the logger is configured
/// from this very file.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warning: Option<String>,
}

/// Reads the configuration from `explicit`, or from `./link_preview.ron` if present.
///
/// An explicit path that cannot be read is an error. A missing default file yields
/// defaults; a file that does not parse yields defaults plus a warning.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<LoadedConfig> {
    let (path, content) = match explicit {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            (path.to_path_buf(), content)
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(content) => (path, content),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(LoadedConfig {
                        config: PersistedConfig::default().into(),
                        warning: None,
                    });
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("reading config file {}", path.display()));
                }
            }
        }
    };

    Ok(parse(&path, &content))
}

fn parse(path: &Path, content: &str) -> LoadedConfig {
    match ron::from_str::<PersistedConfig>(content) {
        Ok(persisted) => LoadedConfig {
            config: persisted.into(),
            warning: None,
        },
        Err(err) => LoadedConfig {
            config: PersistedConfig::default().into(),
            warning: Some(format!(
                "Ignoring unparsable config {}: {}",
                path.display(),
                err
            )),
        },
    }
}
