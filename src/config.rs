//! Application-level configuration loading, including storage backend selection.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MESTRES_BACK_CONFIG_PATH";
/// Problems generated per session unless the configuration says otherwise.
const DEFAULT_PROBLEMS_PER_SESSION: usize = 10;
/// Directory backing the local durable store.
const DEFAULT_DATA_DIR: &str = "data/mestres-back";

/// Which result-store implementation the supervisor should connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Local durable JSON store only.
    File,
    /// Remote CouchDB store wrapped with the local store as fallback.
    CouchWithFallback,
}

/// Storage-related settings resolved from the configuration file.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Selected backend.
    pub backend: StorageBackend,
    /// Directory used by the local store (primary or fallback role).
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    problems_per_session: usize,
    storage: StorageSettings,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        problems = config.problems_per_session,
                        backend = ?config.storage.backend,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Number of problems generated for each new session.
    pub fn problems_per_session(&self) -> usize {
        self.problems_per_session
    }

    /// Storage backend selection.
    pub fn storage(&self) -> &StorageSettings {
        &self.storage
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            problems_per_session: DEFAULT_PROBLEMS_PER_SESSION,
            storage: StorageSettings {
                backend: StorageBackend::File,
                data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    problems_per_session: Option<usize>,
    #[serde(default)]
    storage: Option<RawStorage>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of the storage section.
struct RawStorage {
    #[serde(default)]
    backend: Option<String>,
    #[serde(default)]
    data_dir: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = Self::default();

        let problems_per_session = match raw.problems_per_session {
            Some(0) => {
                warn!("problems_per_session must be positive; using the default");
                defaults.problems_per_session
            }
            Some(count) => count,
            None => defaults.problems_per_session,
        };

        let storage = match raw.storage {
            Some(raw_storage) => {
                let backend = match raw_storage.backend.as_deref() {
                    Some("file") | None => StorageBackend::File,
                    Some("couch") => StorageBackend::CouchWithFallback,
                    Some(other) => {
                        warn!(backend = other, "unknown storage backend; using the file store");
                        StorageBackend::File
                    }
                };
                StorageSettings {
                    backend,
                    data_dir: raw_storage
                        .data_dir
                        .map(PathBuf::from)
                        .unwrap_or(defaults.storage.data_dir),
                }
            }
            None => defaults.storage,
        };

        Self {
            problems_per_session,
            storage,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_the_file_store() {
        let config = AppConfig::default();
        assert_eq!(config.problems_per_session(), 10);
        assert_eq!(config.storage().backend, StorageBackend::File);
    }

    #[test]
    fn raw_config_overrides_and_clamps() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"problems_per_session": 12, "storage": {"backend": "couch", "data_dir": "/tmp/x"}}"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.problems_per_session(), 12);
        assert_eq!(config.storage().backend, StorageBackend::CouchWithFallback);
        assert_eq!(config.storage().data_dir, PathBuf::from("/tmp/x"));

        let raw: RawConfig = serde_json::from_str(r#"{"problems_per_session": 0}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.problems_per_session(), 10);
    }

    #[test]
    fn unknown_backend_falls_back_to_file() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"storage": {"backend": "oracle"}}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.storage().backend, StorageBackend::File);
    }
}
