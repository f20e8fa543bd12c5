//! # Room Chat
//!
//! Entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - The room hub
//! - HTTP/WebSocket server

use anyhow::Result;
use tracing::info;

use room_chat::config::Settings;
use room_chat::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    room_chat::telemetry::init_tracing();

    info!("Starting Room Chat...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
