//! Shared application state

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::events::EventHub;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a request handler needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt_secret: String,
    pub toss_secret_key: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub default_language: String,
    pub snapshots: SnapshotCache,
    pub events: EventHub,
}

impl AppState {
    /// Connect to the database, run pending migrations, and wire up the
    /// snapshot cache and event hub.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            toss_secret_key: config.toss_secret_key.clone(),
            stripe_secret_key: config.stripe_secret_key.clone(),
            stripe_webhook_secret: config.stripe_webhook_secret.clone(),
            default_language: config.default_language.clone(),
            snapshots: SnapshotCache::new(
                &config.snapshot_dir,
                Duration::from_secs(config.cache_max_age_secs),
            ),
            events: EventHub::new(),
        })
    }
}
