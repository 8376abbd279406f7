use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fintrack_api::database::{connect_from_env, MemoryStore, PgStore};
use fintrack_api::{app, config, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let settings = config::config();
    tracing::info!(
        "Starting fintrack API in {:?} mode (locale {:?})",
        settings.environment,
        settings.locale
    );

    if is_production!() && settings.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every token request will fail");
    }

    let state = match connect_from_env().await.context("connecting to PostgreSQL")? {
        Some(pool) => {
            tracing::info!("Using PostgreSQL store");
            AppState::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
            AppState::new(MemoryStore::default())
        }
    };

    // Allow tests or deployments to override port via env
    let port = std::env::var("FINTRACK_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("fintrack API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
