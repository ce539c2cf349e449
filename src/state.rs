use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{AuthService, TokenKeys};
use crate::config::Config;
use crate::store::memory::{MemoryCredentialStore, MemoryTaskStore, MemoryTokenLedger};
use crate::store::{PgCredentialStore, PgTaskStore, PgTokenLedger, TaskStore};

/// Everything a handler needs, constructed once in `main` and shared through
/// `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(auth: AuthService, tasks: Arc<dyn TaskStore>) -> Self {
        Self { auth, tasks }
    }

    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        let auth = AuthService::new(
            Arc::new(PgCredentialStore::new(pool.clone())),
            Arc::new(PgTokenLedger::new(pool.clone())),
            TokenKeys::new(&config.jwt_secret),
            config.bcrypt_cost,
        );
        Self::new(auth, Arc::new(PgTaskStore::new(pool)))
    }

    /// State backed by empty in-memory stores.
    pub fn in_memory(jwt_secret: &str, bcrypt_cost: u32) -> Self {
        let auth = AuthService::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryTokenLedger::new()),
            TokenKeys::new(jwt_secret),
            bcrypt_cost,
        );
        Self::new(auth, Arc::new(MemoryTaskStore::new()))
    }
}
