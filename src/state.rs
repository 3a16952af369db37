use std::sync::Arc;

use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions};
use tracing::info;

use crate::{
    config::{AppConfig, StoreBackend},
    users::repo::{MemoryUserStore, PgUserStore, UserStore},
};

/// Schema for the postgres store; `users.email` carries the unique constraint
/// duplicate registration relies on.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn UserStore> = match config.store {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set for the postgres store")?;
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                MIGRATOR.run(&db).await.context("run migrations")?;
                Arc::new(PgUserStore::new(db))
            }
            StoreBackend::Memory => {
                info!("using in-memory user store; records are lost on exit");
                Arc::new(MemoryUserStore::new())
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a fresh memory store and a fixed secret; the store is
    /// returned too so tests can inspect it.
    pub fn fake() -> (Self, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (Self::fake_with_store(store.clone()), store)
    }

    pub fn fake_with_store(store: Arc<dyn UserStore>) -> Self {
        use crate::config::{JwtConfig, DEFAULT_TOKEN_TTL_SECS};

        let config = Arc::new(AppConfig {
            store: StoreBackend::Memory,
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_seconds: DEFAULT_TOKEN_TTL_SECS,
            },
        });
        Self::from_parts(store, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_create_unique_email() {
        let users = MIGRATOR
            .iter()
            .find(|m| m.sql.contains("CREATE TABLE IF NOT EXISTS users"))
            .expect("users migration is embedded");
        assert!(users.sql.contains("email         TEXT NOT NULL UNIQUE"));
    }
}
