//! WrldBldr Character Builder - Attribute, skill and class configurator
//!
//! The builder:
//! - Tracks attribute points and derives the skill point budget from them
//! - Keeps skill allocations within that budget as attributes change
//! - Reports class eligibility against the current attributes
//! - Loads and debounce-saves the character through a remote record service

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wrldbldr_character_builder=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting WrldBldr Character Builder");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Record service: {} ({:?})", config.record_service_url, config.record_backend);
    tracing::info!("  Identity: {}", config.character_identity);
    tracing::info!("  Save debounce: {:?}", config.save_debounce);

    // Initialize application state
    let state = Arc::new(AppState::new(config)?);
    tracing::info!(
        "Catalog: {} attributes, {} skills, {} classes",
        state.catalog.attributes.len(),
        state.catalog.skills.len(),
        state.catalog.classes.len()
    );

    // Load the stored character before accepting edits
    state.session.start().await;

    let app = http::create_app(state.clone());

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    state.session.close();

    Ok(())
}
