// src/state.rs
use crate::{config::Config, services::token_service::{HmacTokenCodec, TokenCodec}};
use sqlx::SqlitePool;
use std::sync::Arc;

// Estado partilhado por todos os handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub tokens: Arc<dyn TokenCodec>,
    pub token_ttl_secs: u64,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: &Config) -> Self {
        Self {
            db_pool,
            tokens: Arc::new(HmacTokenCodec::new(config.auth_secret.as_bytes())),
            token_ttl_secs: config.token_ttl_secs,
        }
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
