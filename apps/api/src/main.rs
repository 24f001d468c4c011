mod config;
mod errors;
mod imaging;
mod llm_client;
mod quiz;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::imaging::build_image_generator;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Soul Animal API v{}", env!("CARGO_PKG_VERSION"));
    info!("Theme: {:?}", config.theme);

    let timeout = Duration::from_secs(config.request_timeout_secs);

    // Initialize LLM client (absent key is reported per request, not fatal here)
    let llm: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(api_key) => {
            let client = LlmClient::new(
                api_key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
                timeout,
            )?;
            info!("LLM client initialized (model: {})", config.gemini_model);
            Some(Arc::new(client))
        }
        None => {
            warn!("GEMINI_API_KEY is not set; readings will fail with a configuration error");
            None
        }
    };

    // Initialize the optional image backend
    let images = build_image_generator(&config)?;

    let state = AppState {
        config: config.clone(),
        llm,
        images,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
