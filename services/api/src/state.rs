use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionStore;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    sessions: Arc<dyn SessionStore>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: Arc<dyn SessionStore>, config: Config) -> Self {
        Self {
            store,
            sessions,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
