//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::lookup::{DocumentSource, LookupRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    lookups: LookupRegistry,
}

impl AppState {
    /// Create application state over the given document source
    pub fn new(config: Config, source: Arc<dyn DocumentSource>) -> Self {
        let lookups = LookupRegistry::new(source, config.registry());
        Self {
            inner: Arc::new(AppStateInner { config, lookups }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the per-share lookup registry
    pub fn lookups(&self) -> &LookupRegistry {
        &self.inner.lookups
    }
}
