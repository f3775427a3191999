use std::sync::Arc;

use drobe_core::{
    CompositeOrchestrator, Config, Poller, ProcessWorker, RemoteStore, SanitizedConfig, StateStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn RemoteStore>,
    composite: Arc<CompositeOrchestrator<ProcessWorker>>,
    poller: Option<Arc<Poller>>,
    state_store: Option<Arc<dyn StateStore>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn RemoteStore>,
        composite: Arc<CompositeOrchestrator<ProcessWorker>>,
        poller: Option<Arc<Poller>>,
        state_store: Option<Arc<dyn StateStore>>,
    ) -> Self {
        Self {
            config,
            store,
            composite,
            poller,
            state_store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    pub fn composite(&self) -> &CompositeOrchestrator<ProcessWorker> {
        &self.composite
    }

    pub fn poller(&self) -> Option<&Arc<Poller>> {
        self.poller.as_ref()
    }

    pub fn state_store(&self) -> Option<&Arc<dyn StateStore>> {
        self.state_store.as_ref()
    }
}
