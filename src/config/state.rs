// Application state module
// Bundles configuration, the user store, and the view engine for handlers

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::render::ViewEngine;
use crate::store::UserStore;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
    pub views: ViewEngine,

    // Cached flag for fast access without reading config on the hot path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            users: UserStore::new(),
            views: ViewEngine::from_config(&config.views),
            cached_access_log: AtomicBool::new(config.logging.access_log),
            config: config.clone(),
        }
    }
}
