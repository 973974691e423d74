use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use catalog_core::QueryBuildError;
use catalog_engine::{demo_catalog, EngineConfig, QueryBackend, ReaderSettings, RestSettings};
use catalog_logging::{catalog_info, catalog_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogDestination;

pub(crate) const DEFAULT_CONFIG_PATH: &str = "catalog.ron";
pub(crate) const API_KEY_ENV: &str = "CATALOG_API_KEY";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub query_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub featured_limit: usize,
    pub demo: bool,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: RestSettings::default().base_url,
            api_key: None,
            query_timeout_secs: 10,
            request_timeout_secs: 15,
            featured_limit: 6,
            demo: false,
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    pub(crate) fn engine_config(&self) -> Result<EngineConfig, QueryBuildError> {
        let backend = if self.demo {
            QueryBackend::Memory(Arc::new(demo_catalog()))
        } else {
            QueryBackend::Rest(RestSettings {
                base_url: self.base_url.clone(),
                api_key: self.api_key.clone(),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                ..RestSettings::default()
            })
        };
        let reader = ReaderSettings {
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        };
        EngineConfig::dashboard(backend, reader, self.featured_limit)
    }

    /// How long the front-end waits for every panel before rendering anyway.
    pub(crate) fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.saturating_add(2))
    }
}

/// Loads the config file; a missing file yields defaults. The API key
/// environment variable wins over the file.
pub(crate) fn load_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            catalog_warn!("No config at {:?}; using defaults", path);
            AppConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.api_key = Some(key);
        }
    }
    catalog_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{load_or_default, AppConfig, ConfigError};
    use crate::logging::LogDestination;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_or_default(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config.featured_limit, AppConfig::default().featured_limit);
        assert!(!config.demo);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.ron");
        std::fs::write(
            &path,
            "(base_url: \"https://store.example.co\", demo: true, log_destination: Terminal)",
        )
        .unwrap();

        let config = load_or_default(&path).unwrap();
        assert_eq!(config.base_url, "https://store.example.co");
        assert!(config.demo);
        assert_eq!(config.log_destination, LogDestination::Terminal);
        assert_eq!(config.query_timeout_secs, 10);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.ron");
        std::fs::write(&path, "(base_url: ").unwrap();
        assert!(matches!(
            load_or_default(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn demo_config_builds_dashboard() {
        let config = AppConfig {
            demo: true,
            featured_limit: 0,
            ..AppConfig::default()
        };
        let engine = config.engine_config().unwrap();
        assert_eq!(engine.stat_specs.len(), 4);
        assert_eq!(engine.listings.len(), 2);
        assert_eq!(engine.listings[0].1.limit(), None);
    }
}
