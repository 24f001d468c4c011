//! Axum route handlers for the quiz API.

use axum::{
    extract::{FromRequest, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::quiz::questions::{Question, QuizAnswer, QUESTIONS};
use crate::quiz::reading::{summon, SoulReading};
use crate::quiz::theme::Theme;
use crate::quiz::wizard::{PageView, WizardSession, PAGES};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// `Json` extractor whose rejections use the `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub theme: Theme,
    pub questions: &'static [Question],
    /// Question indices per wizard page.
    pub pages: Vec<&'static [usize]>,
    pub stat_axes: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
pub struct ReadingRequest {
    pub answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WizardAdvanceRequest {
    /// Absent on the first call.
    #[serde(default)]
    pub session: WizardSession,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WizardSessionRequest {
    pub session: WizardSession,
}

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub session: WizardSession,
    /// Next page to show; absent once every page is answered.
    pub page: Option<PageView>,
}

impl From<WizardSession> for WizardResponse {
    fn from(session: WizardSession) -> Self {
        let page = session.page_view();
        WizardResponse { session, page }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/quiz
///
/// The question set, wizard layout and the active theme's trait axes.
pub async fn handle_get_quiz(State(state): State<AppState>) -> Json<QuizResponse> {
    let theme = state.config.theme;
    Json(QuizResponse {
        theme,
        questions: &QUESTIONS,
        pages: PAGES.to_vec(),
        stat_axes: theme.stat_axes(),
    })
}

/// POST /api/v1/readings
///
/// Single-page flow: all five answers at once.
pub async fn handle_create_reading(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReadingRequest>,
) -> Result<Json<SoulReading>, AppError> {
    let answers = QuizAnswer::collect(&request.answers)?;
    run_reading(&state, &answers).await
}

/// POST /api/v1/wizard/advance
///
/// Records the current page's answers and returns the next page.
pub async fn handle_wizard_advance(
    AppJson(request): AppJson<WizardAdvanceRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = request.session.advance(&request.choices)?;
    Ok(Json(session.into()))
}

/// POST /api/v1/wizard/back
pub async fn handle_wizard_back(
    AppJson(request): AppJson<WizardSessionRequest>,
) -> Json<WizardResponse> {
    Json(request.session.back().into())
}

/// POST /api/v1/wizard/reading
///
/// Runs the reading for a wizard session that reached the result step.
pub async fn handle_wizard_reading(
    State(state): State<AppState>,
    AppJson(request): AppJson<WizardSessionRequest>,
) -> Result<Json<SoulReading>, AppError> {
    let answers = request.session.completed_answers()?;
    run_reading(&state, &answers).await
}

async fn run_reading(state: &AppState, answers: &QuizAnswer) -> Result<Json<SoulReading>, AppError> {
    let reading = summon(
        state.llm.as_deref(),
        state.images.as_deref(),
        state.config.theme,
        answers,
    )
    .await?;
    Ok(Json(reading))
}
