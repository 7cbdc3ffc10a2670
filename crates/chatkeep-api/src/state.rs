//! Application state wiring all services together.
//!
//! The orchestrator is generic over its store; AppState pins it to the
//! JSON-file implementation. The provider factory and config source stay
//! behind trait objects so tests can swap them.

use std::path::PathBuf;
use std::sync::Arc;

use chatkeep_core::chat::orchestrator::ChatOrchestrator;
use chatkeep_core::config::{ConfigHandle, ConfigSource};
use chatkeep_core::llm::factory::ProviderFactory;
use chatkeep_infra::config::{config_from_env, EnvConfigSource};
use chatkeep_infra::llm::OpenAiProviderFactory;
use chatkeep_infra::storage::JsonFileSessionStore;
use chatkeep_types::config::ChatConfig;

/// Concrete orchestrator pinned to the infra store.
pub type ConcreteOrchestrator = ChatOrchestrator<JsonFileSessionStore>;

/// Shared application state.
///
/// Cloned into every request; all fields are cheap `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<ConfigHandle>,
    pub config_source: Arc<dyn ConfigSource>,
    pub providers: Arc<dyn ProviderFactory>,
    /// Static frontend directory, served when it exists.
    pub web_dir: Option<PathBuf>,
}

impl AppState {
    /// Wire the production services: JSON store, OpenAI, environment config.
    pub fn init(
        store_dir: PathBuf,
        env_source: EnvConfigSource,
        web_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config = config_from_env()?;
        Ok(Self::new(
            JsonFileSessionStore::new(store_dir),
            config,
            Arc::new(env_source),
            Arc::new(OpenAiProviderFactory),
            web_dir,
        ))
    }

    pub fn new(
        store: JsonFileSessionStore,
        config: ChatConfig,
        config_source: Arc<dyn ConfigSource>,
        providers: Arc<dyn ProviderFactory>,
        web_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(ChatOrchestrator::new(Arc::new(store))),
            config: Arc::new(ConfigHandle::new(config)),
            config_source,
            providers,
            web_dir,
        }
    }

    /// The session store behind the orchestrator.
    pub fn store(&self) -> &JsonFileSessionStore {
        self.orchestrator.store()
    }
}
