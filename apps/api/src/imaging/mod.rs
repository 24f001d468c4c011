//! Image backends — turn an archetype's `image_prompt` into an image URL.
//!
//! Image generation is optional and never fatal: a reading renders in full
//! whether the backend is missing, slow, or failing. `AppState` carries an
//! `Option<Arc<dyn ImageGenerator>>`, chosen once at startup from config.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, ImageBackendKind};

pub mod pollinations;
pub mod siliconflow;

pub use pollinations::PollinationsClient;
pub use siliconflow::SiliconFlowClient;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Image API returned no image URL")]
    NoImage,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Renders `prompt` and returns a URL the client can load directly.
    async fn render(&self, prompt: &str) -> Result<String, ImageError>;

    /// Backend name, for logs and result metadata.
    fn backend(&self) -> &'static str;
}

/// Parses `WIDTHxHEIGHT`, e.g. `1024x1024`.
pub fn parse_image_size(size: &str) -> Option<(u32, u32)> {
    let (w, h) = size.trim().split_once(['x', 'X'])?;
    let width = w.trim().parse().ok()?;
    let height = h.trim().parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

/// Builds the configured image backend, or `None` for text-only readings.
pub fn build_image_generator(
    config: &Config,
) -> Result<Option<Arc<dyn ImageGenerator>>, ImageError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    if config.image_backend == ImageBackendKind::SiliconFlow && config.image_api_key.is_none() {
        warn!("IMAGE_BACKEND=siliconflow but IMAGE_API_KEY is not set; readings will be text-only");
    }

    let generator: Option<Arc<dyn ImageGenerator>> = match config.effective_image_backend() {
        ImageBackendKind::None => None,
        ImageBackendKind::SiliconFlow => match &config.image_api_key {
            Some(api_key) => Some(Arc::new(SiliconFlowClient::new(
                api_key.clone(),
                config.image_model.clone(),
                config.image_size.clone(),
                config.image_base_url.clone(),
                timeout,
            )?)),
            None => None,
        },
        ImageBackendKind::Pollinations => {
            let (width, height) = parse_image_size(&config.image_size).unwrap_or_else(|| {
                warn!(
                    "IMAGE_SIZE '{}' is not WIDTHxHEIGHT; using 1024x1024",
                    config.image_size
                );
                (1024, 1024)
            });
            Some(Arc::new(PollinationsClient::new(
                config.pollinations_host.clone(),
                width,
                height,
                timeout,
            )?))
        }
    };

    match &generator {
        Some(g) => info!("Image backend initialized: {}", g.backend()),
        None => info!("No image backend configured; readings will be text-only"),
    }

    Ok(generator)
}
