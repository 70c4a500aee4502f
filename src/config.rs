//! Application-level configuration loading, including the shared admin key.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QR_HUNT_BACK_CONFIG_PATH";
/// Environment variable that overrides the admin key from the config file.
const ADMIN_KEY_ENV: &str = "ADMIN_KEY";
/// Key the original deployment shipped with; only used when nothing else is configured.
const DEFAULT_ADMIN_KEY: &str = "ADMIN2025";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
///
/// The admin key is deliberately plain configuration handed to the admin
/// layer at construction. It is a UI gate, not a security boundary.
pub struct AppConfig {
    admin_key: String,
}

impl AppConfig {
    /// Load the application configuration from disk, applying environment
    /// overrides and falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
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
        };

        if let Ok(key) = env::var(ADMIN_KEY_ENV)
            && !key.is_empty()
        {
            config.admin_key = key;
        }

        if config.admin_key == DEFAULT_ADMIN_KEY {
            warn!("running with the built-in default admin key");
        }

        config
    }

    /// The shared key required by admin routes.
    pub fn admin_key(&self) -> &str {
        &self.admin_key
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_key: DEFAULT_ADMIN_KEY.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(rename = "adminKey")]
    admin_key: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            admin_key: value
                .admin_key
                .filter(|key| !key.is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_KEY.to_owned()),
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
