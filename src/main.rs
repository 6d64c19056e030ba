//! Vacation pay API server.
//!
//! Environment:
//! - `FERIAS_CONFIG_DIR`: tax table directory (default `./config/clt`)
//! - `FERIAS_HISTORY_FILE`: simulation history file (in memory when unset)
//! - `PORT`: listening port (default 3000)
//! - `RUST_LOG`: log filter

use std::env;
use std::error::Error;
use std::net::SocketAddr;

use ferias_engine::api::{AppState, create_router};
use ferias_engine::config::ConfigLoader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ferias_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir = env::var("FERIAS_CONFIG_DIR").unwrap_or_else(|_| "./config/clt".to_string());
    let config = ConfigLoader::load(&config_dir)?;
    tracing::info!(
        config_dir = %config_dir,
        jurisdiction = %config.jurisdiction().code,
        tables = config.config().tables().len(),
        "Tax tables loaded"
    );

    let state = match env::var("FERIAS_HISTORY_FILE") {
        Ok(path) => {
            tracing::info!(path = %path, "Using simulation history file");
            AppState::with_history_file(config, path)?
        }
        Err(_) => AppState::new(config),
    };

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
