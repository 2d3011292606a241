#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use relief_service::{config::AuthSettings, database::MemoryStore, AppState};

pub const SECRET: &str = "integration-secret";

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: SECRET.to_string(),
        token_ttl: Duration::hours(1),
    }
}

/// Fresh store plus the state wrapping it; the store handle lets tests seed
/// and inspect collections directly.
pub fn state() -> (Arc<MemoryStore>, web::Data<AppState>) {
    let store = Arc::new(MemoryStore::new());
    let state = web::Data::new(AppState::new(store.clone(), auth_settings()));
    (store, state)
}
