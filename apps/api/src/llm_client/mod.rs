/// LLM Client — the single point of entry for text-generation calls.
///
/// No other module talks to the Gemini API directly. Readings depend on the
/// `TextGenerator` trait so tests and alternative backends can be swapped in.
///
/// Calls are made once: there is no retry loop. Failures surface as
/// `LlmError`, which the request boundary turns into an upstream error that
/// records whether a retry is worth it.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked by the model: {reason}")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Http(e) if e.is_timeout())
    }

    /// Timeouts, connection failures, rate limits and 5xx are worth retrying;
    /// auth failures, blocked prompts and empty output are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_timeout() || e.is_connect(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Blocked { .. } | LlmError::EmptyContent => false,
        }
    }
}

/// Anything that can turn a prompt into raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn into_text(self) -> Result<String, LlmError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(LlmError::Blocked { reason });
        }
        self.text().ok_or(LlmError::EmptyContent)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.into_text()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{Method, StatusCode},
        response::IntoResponse,
    };

    use super::*;
    use crate::errors::AppError;
    use crate::test_support::MockUpstream;

    fn response_from(json: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_text_joins_parts_of_first_candidate() {
        let response = response_from(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"animal\":"}, {"text": "\"Fox\"}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
        }));
        assert_eq!(response.text().as_deref(), Some("{\"animal\":\"Fox\"}"));
    }

    #[test]
    fn test_no_candidates_is_empty_content() {
        let response = response_from(serde_json::json!({ "candidates": [] }));
        assert!(matches!(response.into_text(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_whitespace_only_text_is_empty_content() {
        let response = response_from(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "  \n"}]}}]
        }));
        assert!(matches!(response.into_text(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_block_reason_is_reported() {
        let response = response_from(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }));
        match response.into_text() {
            Err(LlmError::Blocked { reason }) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_message_extracts_message() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(api_error_message(body.to_string()), "API key not valid");
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("gateway down".to_string()), "gateway down");
    }

    #[test]
    fn test_retryable_classification() {
        let quota = LlmError::Api {
            status: 429,
            message: String::new(),
        };
        let server = LlmError::Api {
            status: 503,
            message: String::new(),
        };
        let auth = LlmError::Api {
            status: 401,
            message: String::new(),
        };
        assert!(quota.is_retryable());
        assert!(server.is_retryable());
        assert!(!auth.is_retryable());
        assert!(!LlmError::EmptyContent.is_retryable());
        assert!(!auth.is_timeout());
    }

    #[test]
    fn test_endpoint_uses_model_and_trims_base() {
        let client = LlmClient::new(
            "key".to_string(),
            "gemini-2.5-flash".to_string(),
            "https://generativelanguage.googleapis.com/".to_string(),
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    fn client_for(base_url: &str, timeout: Duration) -> LlmClient {
        LlmClient::new(
            "test-key".to_string(),
            "gemini-2.5-flash".to_string(),
            base_url.to_string(),
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_with_api_key() {
        let upstream = MockUpstream::start(
            StatusCode::OK,
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"animal\":\"Fox\"}"}]}}]}"#,
        )
        .await;
        let client = client_for(&upstream.base_url, Duration::from_secs(5));

        let text = client.generate("hello").await.unwrap();
        assert_eq!(text, r#"{"animal":"Fox"}"#);

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(
            requests[0].path,
            "/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(requests[0].headers["x-goog-api-key"], "test-key");
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
            })
        );
    }

    #[tokio::test]
    async fn test_generate_reports_api_error_message() {
        let upstream = MockUpstream::start(
            StatusCode::FORBIDDEN,
            r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#,
        )
        .await;
        let client = client_for(&upstream.base_url, Duration::from_secs(5));

        let err = client.generate("hello").await.unwrap_err();
        match &err {
            LlmError::Api { status, message } => {
                assert_eq!(*status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Api, got {other:?}"),
        }
        assert!(!err.is_retryable());
        assert!(matches!(
            AppError::from(err),
            AppError::Upstream {
                retryable: false,
                timed_out: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let upstream = MockUpstream::start(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;
        let client = client_for(&upstream.base_url, Duration::from_secs(5));

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(&err, LlmError::Api { status: 503, message } if message == "overloaded"));
        assert!(err.is_retryable());
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out_as_retryable_gateway_timeout() {
        let upstream = MockUpstream::stalled().await;
        let client = client_for(&upstream.base_url, Duration::from_millis(200));

        let err = client.generate("hello").await.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.is_retryable());

        let app_error = AppError::from(err);
        assert!(matches!(
            app_error,
            AppError::Upstream {
                retryable: true,
                timed_out: true,
                ..
            }
        ));
        assert_eq!(
            app_error.into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
