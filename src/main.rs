//! Entry point: load config, connect the store, and run the server.

use relief_api::auth::JwtSecret;
use relief_api::config::Config;
use relief_api::db::{self, PgStore};
use relief_api::{create_app, AppState};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Any failure here aborts startup before the listener is bound.
    let db_pool = db::create_pool(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("database connect: {}", e))?;
    db::ensure_schema(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("database schema: {}", e))?;
    tracing::info!("connected to database");

    let store = Arc::new(PgStore::new(db_pool));
    let jwt_secret = JwtSecret::new(config.jwt_secret.clone(), config.token_expiry);
    let state = AppState::new(store.clone(), store, jwt_secret);

    let app = create_app(state).layer(TimeoutLayer::new(config.request_timeout));

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
