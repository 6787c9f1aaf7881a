use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lojistas_client::SerpApiClient;
use lojistas_gateway::{router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // Missing SERPAPI_KEY exits here with clap's usage message
    let config = Config::parse();
    config.validate()?;

    let provider = SerpApiClient::new(&config.serpapi_key, &config.serpapi_url)
        .context("Failed to create SerpAPI client")?;
    let state = Arc::new(AppState::new(Arc::new(provider)).with_link_mode(config.link_mode.into()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on port {}", config.port);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
