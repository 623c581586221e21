use std::sync::Arc;

use calsync_core::{Config, EventStore, PermissionGate};

/// Shared application state.
///
/// Config is loaded once at startup and injected here; nothing mutates it
/// afterwards. The store carries its own write lock, so the state is cheap
/// to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<EventStore>,
    pub gate: Arc<PermissionGate>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(EventStore::new(&config));
        let gate = Arc::new(PermissionGate::new(&config));
        AppState {
            config: Arc::new(config),
            store,
            gate,
        }
    }
}
