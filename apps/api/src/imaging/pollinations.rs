//! Free image-rendering URL service.
//!
//! The image lives at a URL derived from the prompt. A fresh random seed per
//! request keeps caches from serving the previous user's picture.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;

use super::{ImageError, ImageGenerator};

/// Builds `https://<host>/prompt/<encoded prompt>?width=&height=&seed=`.
/// A host that already carries a scheme is used as-is.
pub fn render_url(host: &str, prompt: &str, width: u32, height: u32, seed: u32) -> String {
    let host = host.trim_end_matches('/');
    let base = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    format!(
        "{base}/prompt/{}?width={width}&height={height}&seed={seed}",
        urlencoding::encode(prompt)
    )
}

#[derive(Clone)]
pub struct PollinationsClient {
    client: Client,
    host: String,
    width: u32,
    height: u32,
}

impl PollinationsClient {
    pub fn new(host: String, width: u32, height: u32, timeout: Duration) -> Result<Self, ImageError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            host,
            width,
            height,
        })
    }
}

#[async_trait]
impl ImageGenerator for PollinationsClient {
    /// Fetches the rendered image once so a broken URL is reported as a
    /// failure instead of a dead image on the page.
    async fn render(&self, prompt: &str) -> Result<String, ImageError> {
        let seed: u32 = rand::thread_rng().gen();
        let url = render_url(&self.host, prompt, self.width, self.height, seed);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(url)
    }

    fn backend(&self) -> &'static str {
        "pollinations"
    }
}
