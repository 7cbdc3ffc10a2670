//! Active configuration snapshot with explicit reload.
//!
//! [`ConfigHandle`] owns the process-wide [`ChatConfig`]. Readers take an
//! `Arc` snapshot and keep using it for the whole request; `reload` builds a
//! complete replacement first and swaps it in under the write lock, so no
//! reader ever sees a half-updated config.

use std::sync::{Arc, RwLock};

use chatkeep_types::config::ChatConfig;
use chatkeep_types::error::ConfigError;
use tracing::info;

/// Where configuration snapshots come from.
///
/// Implemented in chatkeep-infra by `EnvConfigSource`.
pub trait ConfigSource: Send + Sync {
    /// Build a fresh snapshot. Called once at startup and again on each reload.
    fn load(&self) -> Result<ChatConfig, ConfigError>;
}

/// Holder of the active configuration snapshot.
pub struct ConfigHandle {
    current: RwLock<Arc<ChatConfig>>,
}

impl ConfigHandle {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// The active snapshot.
    pub fn current(&self) -> Arc<ChatConfig> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the active snapshot, returning the previous one.
    pub fn replace(&self, config: ChatConfig) -> Arc<ChatConfig> {
        let next = Arc::new(config);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    /// Rebuild the snapshot from `source` and swap it in.
    ///
    /// On error the previous snapshot stays active.
    pub fn reload(&self, source: &dyn ConfigSource) -> Result<Arc<ChatConfig>, ConfigError> {
        let config = source.load()?;
        self.replace(config);
        let active = self.current();
        info!(
            model = %active.model,
            context_enabled = active.context_enabled,
            api_key_present = active.has_api_key(),
            "Configuration reloaded"
        );
        Ok(active)
    }
}
