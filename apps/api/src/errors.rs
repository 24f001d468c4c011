use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::quiz::interpreter::MalformedResponse;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required credential is missing. Fatal to the request, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The text-generation call itself failed (network, auth, quota, empty output).
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        retryable: bool,
        timed_out: bool,
    },

    /// Generation succeeded but the output could not be parsed as the archetype schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Upstream {
            retryable: e.is_retryable(),
            timed_out: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

/// Unreadable or mis-shaped request bodies are the caller's fault, reported
/// in the same envelope as every other error.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MalformedResponse> for AppError {
    fn from(e: MalformedResponse) -> Self {
        AppError::MalformedResponse(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                    None,
                )
            }
            AppError::Upstream {
                message,
                retryable,
                timed_out,
            } => {
                tracing::error!("Upstream error (retryable={retryable}): {message}");
                let (status, code) = if *timed_out {
                    (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
                } else {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
                };
                (
                    status,
                    code,
                    "The oracle could not be reached".to_string(),
                    Some(json!({ "reason": message, "retryable": retryable })),
                )
            }
            AppError::MalformedResponse(msg) => {
                tracing::warn!("Malformed model response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The oracle answered in a form that could not be read".to_string(),
                    Some(json!({ "reason": msg })),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(detail) = detail {
            error["detail"] = detail;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
