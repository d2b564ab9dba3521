//! Boots the property API: Postgres for records, Redis for sessions when
//! configured, and the axum router on top.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use property_api::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use property_api::store::PgStore;
use property_api::{router, AppState, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn session_store(config: &Config) -> Arc<dyn SessionStore> {
    let Some(url) = config.redis_url.as_deref() else {
        tracing::warn!("REDIS_URL not set, sessions are kept in memory");
        return Arc::new(MemorySessionStore::new());
    };
    match RedisSessionStore::connect(url).await {
        Ok(store) => Arc::new(store),
        Err(error) => {
            tracing::warn!(%error, "failed to connect to redis, sessions are kept in memory");
            Arc::new(MemorySessionStore::new())
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_db_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to postgres")?;

    let store = PgStore::new(pool);
    store.migrate().await.context("failed to run migrations")?;

    let sessions = session_store(&config).await;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(Arc::new(store), sessions, config));

    tracing::info!(%addr, "property api starting");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind api listener on {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("api server exited with error")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(error) = run(Config::from_env()).await {
        tracing::error!(?error, "api service stopped");
        std::process::exit(1);
    }
}
