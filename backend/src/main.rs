use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use backend::cache::EventCache;
use backend::config::AppConfig;
use backend::crypto::FieldCipher;
use backend::db::{self, AppState};
use backend::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A missing DB_SECRET aborts right here, before anything listens.
    let config = AppConfig::from_env()?;
    let cipher = Arc::new(FieldCipher::new(&config.db_secret));

    let pool = db::establish_connection_pool(&config.database_url)?;

    let event_cache = match &config.redis_url {
        Some(redis_url) => {
            let cache = EventCache::new(redis_url, cipher.clone(), config.event_cache_ttl)?;
            tracing::info!("event cache enabled");
            Some(Arc::new(cache))
        }
        None => {
            tracing::info!("REDIS_URL not set, event cache disabled");
            None
        }
    };

    let state = AppState {
        pool,
        cipher,
        event_cache,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
