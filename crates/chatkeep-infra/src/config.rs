//! Environment-backed configuration.
//!
//! Settings come from process environment variables, optionally seeded from a
//! `.env` file. At startup the file never overrides variables that are
//! already set; on reload it does, so edits to `.env` take effect.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chatkeep_core::config::ConfigSource;
use chatkeep_types::config::ChatConfig;
use chatkeep_types::error::ConfigError;
use secrecy::SecretString;
use tracing::{info, warn};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_SYSTEM_PROMPT: &str = "SYSTEM_PROMPT";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_ENABLE_CONTEXT: &str = "ENABLE_CONTEXT";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "CHATKEEP_REQUEST_TIMEOUT_SECS";

/// Build a [`ChatConfig`] from a variable lookup.
///
/// Empty values count as unset. `ENABLE_CONTEXT` is on unless its value is
/// something other than `true` (case-insensitive).
pub fn config_from_lookup<F>(lookup: F) -> Result<ChatConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let defaults = ChatConfig::default();

    let request_timeout = match get(ENV_REQUEST_TIMEOUT) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: ENV_REQUEST_TIMEOUT.to_string(),
                    value: raw,
                });
            }
        },
        None => defaults.request_timeout,
    };

    Ok(ChatConfig {
        api_key: get(ENV_API_KEY).map(SecretString::from),
        system_prompt: get(ENV_SYSTEM_PROMPT).unwrap_or(defaults.system_prompt),
        model: get(ENV_MODEL).unwrap_or(defaults.model),
        context_enabled: get(ENV_ENABLE_CONTEXT)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true),
        base_url: get(ENV_BASE_URL).unwrap_or(defaults.base_url),
        request_timeout,
        ..defaults
    })
}

/// Build a [`ChatConfig`] from the process environment.
pub fn config_from_env() -> Result<ChatConfig, ConfigError> {
    config_from_lookup(|key| std::env::var(key).ok())
}

/// [`ConfigSource`] reading the process environment plus a `.env` file.
#[derive(Debug, Clone)]
pub struct EnvConfigSource {
    dotenv_path: PathBuf,
}

impl EnvConfigSource {
    pub fn new(dotenv_path: impl Into<PathBuf>) -> Self {
        Self {
            dotenv_path: dotenv_path.into(),
        }
    }

    pub fn dotenv_path(&self) -> &Path {
        &self.dotenv_path
    }

    pub fn dotenv_exists(&self) -> bool {
        self.dotenv_path.is_file()
    }

    /// Seed the environment from `.env` without overriding existing variables.
    ///
    /// Returns whether a `.env` file was loaded.
    pub fn prime(&self) -> bool {
        match dotenvy::from_path(&self.dotenv_path) {
            Ok(()) => true,
            Err(e) if e.not_found() => false,
            Err(e) => {
                warn!(path = %self.dotenv_path.display(), error = %e, "Failed to parse .env file");
                false
            }
        }
    }
}

impl ConfigSource for EnvConfigSource {
    /// Re-read `.env` with override, then the environment.
    ///
    /// A malformed `.env` fails the load so the active snapshot is kept.
    /// A missing one is fine.
    fn load(&self) -> Result<ChatConfig, ConfigError> {
        match dotenvy::from_path_override(&self.dotenv_path) {
            Ok(()) => {}
            Err(e) if e.not_found() => {}
            Err(e) => {
                warn!(path = %self.dotenv_path.display(), error = %e, "Failed to parse .env file");
                return Err(ConfigError::Dotenv {
                    path: self.dotenv_path.display().to_string(),
                    message: e.to_string(),
                });
            }
        }
        config_from_env()
    }
}

/// Log what configuration the service is running with.
///
/// Never logs the API key itself, only whether it is present and its length.
pub fn log_startup_summary(config: &ChatConfig, source: &EnvConfigSource) {
    if source.dotenv_exists() {
        info!(path = %source.dotenv_path().display(), "Loaded environment from .env");
    } else {
        warn!("No .env file found, using system environment variables only");
    }

    match &config.api_key {
        Some(key) => {
            use secrecy::ExposeSecret;
            info!(length = key.expose_secret().len(), "{ENV_API_KEY} found");
        }
        None => warn!("Missing {ENV_API_KEY}, chat requests will fail"),
    }

    info!(
        length = config.system_prompt.len(),
        "System prompt configured"
    );
    info!(model = %config.model, base_url = %config.base_url, "Using model");
    info!(
        enabled = config.context_enabled,
        "Context/history {}",
        if config.context_enabled { "ENABLED" } else { "DISABLED" }
    );
}
