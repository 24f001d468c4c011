use std::sync::Arc;

use crate::config::Config;
use crate::imaging::ImageGenerator;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Text generator. `None` when GEMINI_API_KEY is missing; readings then
    /// fail with a configuration error instead of the server refusing to start.
    pub llm: Option<Arc<dyn TextGenerator>>,
    /// Optional image backend. `None` means text-only readings.
    pub images: Option<Arc<dyn ImageGenerator>>,
}
