//! Soul reading — orchestrates one request end to end.
//!
//! Flow: compile prompt → text generation → interpret → (optional) image.
//!
//! Text failures abort the reading with a typed error. Image failures are
//! logged and recorded on the result; the textual reading is always returned
//! in full once interpretation succeeds.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::imaging::ImageGenerator;
use crate::llm_client::TextGenerator;
use crate::quiz::interpreter::{interpret, ArchetypeResult};
use crate::quiz::profile::compile;
use crate::quiz::questions::QuizAnswer;
use crate::quiz::theme::Theme;
use crate::quiz::view::ResultView;

/// What happened to the optional image stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// No backend configured, or the model gave no image prompt.
    Skipped,
    Ready { url: String, backend: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SoulReading {
    pub reading_id: Uuid,
    pub theme: Theme,
    pub generated_at: DateTime<Utc>,
    pub archetype: ArchetypeResult,
    pub view: ResultView,
    pub image: ImageOutcome,
}

/// Runs one reading. `text` is `None` when the generation key is missing.
pub async fn summon(
    text: Option<&dyn TextGenerator>,
    images: Option<&dyn ImageGenerator>,
    theme: Theme,
    answers: &QuizAnswer,
) -> Result<SoulReading, AppError> {
    let text = text.ok_or_else(|| {
        AppError::Configuration(
            "GEMINI_API_KEY is not configured; the oracle cannot be summoned".to_string(),
        )
    })?;

    let reading_id = Uuid::new_v4();
    let prompt = compile(theme, answers);
    info!(
        "Reading {} started (theme={:?}, model={})",
        reading_id,
        theme,
        text.model()
    );

    let raw = text.generate(&prompt).await?;
    let archetype = interpret(&raw)?;
    info!("Reading {} interpreted: animal={:?}", reading_id, archetype.animal);

    let image = render_image(images, theme, &archetype, reading_id).await;
    let view = ResultView::build(theme, &archetype);

    Ok(SoulReading {
        reading_id,
        theme,
        generated_at: Utc::now(),
        archetype,
        view,
        image,
    })
}

async fn render_image(
    images: Option<&dyn ImageGenerator>,
    theme: Theme,
    archetype: &ArchetypeResult,
    reading_id: Uuid,
) -> ImageOutcome {
    let Some(images) = images else {
        return ImageOutcome::Skipped;
    };

    let subject = archetype.image_prompt.trim();
    if subject.is_empty() {
        return ImageOutcome::Skipped;
    }

    let prompt = format!("{subject}, {}", theme.image_style());
    match images.render(&prompt).await {
        Ok(url) => ImageOutcome::Ready {
            url,
            backend: images.backend().to_string(),
        },
        Err(e) => {
            warn!(
                "Reading {} image generation failed via {}: {}",
                reading_id,
                images.backend(),
                e
            );
            ImageOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
