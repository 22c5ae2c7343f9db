//! IVR simulator
//!
//! Serves a keypad-driven phone menu over JSON for browser clients and
//! over TwiML webhooks for a telephony provider.

mod api;
mod config;
mod menu;
mod runtime;
mod state_machine;
mod telephony;

use api::{create_router, AppState};
use config::IvrConfig;
use menu::MenuDefinition;
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ivr_sim=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = IvrConfig::from_env()?;

    // A malformed menu aborts start-up
    let graph = match &config.menu_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading menu definition");
            MenuDefinition::load(path)?
        }
        None => menu::airline::menu()?,
    };
    tracing::info!(nodes = graph.len(), root = %graph.root_id(), "Menu graph ready");

    if config.agent_number.is_none() {
        tracing::warn!("IVR_AGENT_NUMBER not set; agent transfers will hang up");
    }

    let port = config.port;

    // Create application state
    let state = AppState::new(graph, config);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true).deflate(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("IVR simulator listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
