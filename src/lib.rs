pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use config::AuthSettings;
use database::DocumentStore;

/// Per-process state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, auth: AuthSettings) -> Self {
        Self { store, auth }
    }
}
