mod config;

use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;

use board_api::{AppStateInner, AuthGate};
use board_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "board_server=debug,board_api=debug,board_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Database::open(&config.db_path)?;

    let lifetime = chrono::Duration::try_hours(config.token_ttl_hours)
        .context("BOARD_TOKEN_TTL_HOURS out of range")?;
    let gate = AuthGate::new(config.jwt_secret.as_bytes(), lifetime);
    let state = AppStateInner::new(db, gate);
    let app = board_api::router(state);

    let addr: SocketAddr = config.server_address().parse()?;
    info!("Board server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
