//! Paid image-generation API (`POST /v1/images/generations`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ImageError, ImageGenerator};

const BATCH_SIZE: u32 = 1;

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    image_size: &'a str,
    batch_size: u32,
}

/// Providers disagree on the list name; accept both `images` and `data`.
#[derive(Debug, Default, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    images: Vec<ImageUrl>,
    #[serde(default)]
    data: Vec<ImageUrl>,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    url: Option<String>,
}

impl ImageResponse {
    fn first_url(self) -> Option<String> {
        self.images
            .into_iter()
            .chain(self.data)
            .filter_map(|i| i.url)
            .find(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct SiliconFlowClient {
    client: Client,
    api_key: String,
    model: String,
    image_size: String,
    base_url: String,
}

impl SiliconFlowClient {
    pub fn new(
        api_key: String,
        model: String,
        image_size: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ImageError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            image_size,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageGenerator for SiliconFlowClient {
    async fn render(&self, prompt: &str) -> Result<String, ImageError> {
        let body = ImageRequest {
            model: &self.model,
            prompt,
            image_size: &self.image_size,
            batch_size: BATCH_SIZE,
        };

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ImageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ImageResponse = response.json().await?;
        let url = parsed.first_url().ok_or(ImageError::NoImage)?;
        debug!("Image generated by {}: {}", self.model, url);
        Ok(url)
    }

    fn backend(&self) -> &'static str {
        "siliconflow"
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::test_support::MockUpstream;

    #[test]
    fn test_request_body_shape() {
        let body = ImageRequest {
            model: "black-forest-labs/FLUX.1-schnell",
            prompt: "an owl",
            image_size: "1024x1024",
            batch_size: BATCH_SIZE,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "black-forest-labs/FLUX.1-schnell",
                "prompt": "an owl",
                "image_size": "1024x1024",
                "batch_size": 1
            })
        );
    }

    #[test]
    fn test_first_url_from_images() {
        let response: ImageResponse = serde_json::from_str(
            r#"{"images": [{"url": "https://cdn.example/a.png"}], "timings": {"inference": 1.2}}"#,
        )
        .unwrap();
        assert_eq!(
            response.first_url().as_deref(),
            Some("https://cdn.example/a.png")
        );
    }

    #[test]
    fn test_first_url_from_data() {
        let response: ImageResponse =
            serde_json::from_str(r#"{"data": [{"url": ""}, {"url": "https://cdn.example/b.png"}]}"#)
                .unwrap();
        assert_eq!(
            response.first_url().as_deref(),
            Some("https://cdn.example/b.png")
        );
    }

    #[test]
    fn test_no_url_is_none() {
        let response: ImageResponse = serde_json::from_str(r#"{"images": []}"#).unwrap();
        assert!(response.first_url().is_none());
    }

    fn client_for(base_url: &str) -> SiliconFlowClient {
        SiliconFlowClient::new(
            "sk-image".to_string(),
            "black-forest-labs/FLUX.1-schnell".to_string(),
            "1024x1024".to_string(),
            base_url.to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_render_posts_bearer_request() {
        let upstream = MockUpstream::start(
            StatusCode::OK,
            r#"{"images": [{"url": "https://cdn.example/owl.png"}]}"#,
        )
        .await;

        let url = client_for(&upstream.base_url).render("an owl").await.unwrap();
        assert_eq!(url, "https://cdn.example/owl.png");

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/v1/images/generations");
        assert_eq!(requests[0].headers["authorization"], "Bearer sk-image");
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["prompt"], "an owl");
        assert_eq!(body["batch_size"], 1);
    }

    #[tokio::test]
    async fn test_render_reports_api_error_message() {
        let upstream = MockUpstream::start(
            StatusCode::UNAUTHORIZED,
            r#"{"code": 20015, "message": "Invalid token"}"#,
        )
        .await;

        match client_for(&upstream.base_url).render("an owl").await {
            Err(ImageError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid token");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_render_without_url_is_no_image() {
        let upstream = MockUpstream::start(StatusCode::OK, r#"{"images": []}"#).await;
        let result = client_for(&upstream.base_url).render("an owl").await;
        assert!(matches!(result, Err(ImageError::NoImage)));
    }
}
