//! Solar suitability server - evaluates land parcels for solar-farm potential

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solar_server::config::Config;
use solar_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("solar_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting solar suitability server...");

    // The weight table is the sole scoring tunable; refuse to start if
    // it does not sum to exactly 1.0.
    solar_core::validate_weight_table().context("Invalid scoring configuration")?;

    let config = Config::from_env();
    let port = config.server_port;
    let state = Arc::new(AppState::new(config)?);

    let app = solar_server::api::routes()
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
