use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::auth::jwt::JwtKeys;
use crate::auth::password::PasswordHasher;
use crate::config::AppConfig;
use crate::store::{MemoryUserStore, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Production wiring: env config, Postgres pool, migrations.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        info!("database connected");

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            warn!(error = %e, "migration failed; continuing with existing schema");
        }

        let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db));
        Self::from_parts(store, config)
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let jwt = JwtKeys::new(&config.jwt);
        let hasher = PasswordHasher::new(&config.hash)?;
        Ok(Self {
            store,
            config,
            jwt,
            hasher,
        })
    }

    /// In-memory state for tests: fixed secret and minimal argon2 cost so
    /// suites stay fast, no database involved.
    pub fn fake() -> Self {
        use crate::config::{HashConfig, JwtConfig};

        let config = Arc::new(AppConfig {
            database_url: "postgres://unused".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                ttl_minutes: 60,
            },
            hash: HashConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
        });
        let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        Self::from_parts(store, config).expect("test state should build")
    }
}
