//! hanmall-server — Korean-market storefront API
//!
//! Long-running service that:
//! - Serves the product catalog, cart, and checkout API
//! - Confirms payments through Toss Payments and Stripe
//! - Keeps per-language UI snapshot files fresh for the storefront
//! - Pushes store events to connected tabs over SSE

mod api;
mod auth;
mod cache;
mod config;
mod db;
mod error;
mod events;
mod gateway;
mod state;
mod sync;
mod util;

use std::time::Duration;

use config::Config;
use hanmall_shared::events::StoreEvent;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hanmall_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting hanmall-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    // Warm the snapshot cache so the first storefront request hits the files
    if let Err(e) = state.snapshots.generate(&state.pool).await {
        tracing::warn!(error = ?e, "initial snapshot generation failed");
    }

    // Periodic snapshot refresh, half the freshness window
    let refresh_state = state.clone();
    let refresh_every = Duration::from_secs((config.cache_max_age_secs / 2).max(60));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_every);
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            if let Err(e) = refresh_state.snapshots.generate(&refresh_state.pool).await {
                tracing::warn!(error = ?e, "periodic snapshot refresh failed");
            }
        }
    });

    // SSE heartbeat every 30s keeps idle connections open through proxies
    let heartbeat_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));
        loop {
            interval.tick().await;
            if heartbeat_state.events.subscriber_count() > 0 {
                heartbeat_state.events.publish_event(StoreEvent::heartbeat());
            }
        }
    });

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("hanmall-server listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
