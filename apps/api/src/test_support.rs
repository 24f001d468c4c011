//! Local stand-in for the upstream HTTP services, served on a random port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};

/// One request as the upstream saw it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
    seen: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn reply(
    State(canned): State<Canned>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    canned.seen.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    });
    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}

/// Answers every request with the same status and body.
pub(crate) struct MockUpstream {
    pub base_url: String,
    seen: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub(crate) async fn start(status: StatusCode, body: &'static str) -> Self {
        Self::spawn(status, body, None).await
    }

    /// Accepts requests but never answers within any sane client timeout.
    pub(crate) async fn stalled() -> Self {
        Self::spawn(StatusCode::OK, "{}", Some(Duration::from_secs(60))).await
    }

    async fn spawn(status: StatusCode, body: &'static str, delay: Option<Duration>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new().fallback(reply).with_state(Canned {
            status,
            body,
            delay,
            seen: seen.clone(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, seen }
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.seen.lock().unwrap().clone()
    }
}
