//! Multi-page quiz wizard as an explicit state machine.
//!
//! The session is a plain value owned by the caller and round-tripped by the
//! client on every call; the server holds no per-user state. A page only
//! advances once every question on it has a valid answer.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::quiz::questions::{resolve_choice, QuizAnswer, OPTION_COUNT, QUESTION_COUNT, QUESTIONS};

/// Question indices shown on each wizard page.
pub const PAGES: [&[usize]; 3] = [&[0, 1], &[2, 3], &[4]];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Page1,
    Page2,
    Page3,
    Result,
}

impl WizardStep {
    /// Index into `PAGES`, or `None` once the quiz is complete.
    pub fn page_index(self) -> Option<usize> {
        match self {
            WizardStep::Page1 => Some(0),
            WizardStep::Page2 => Some(1),
            WizardStep::Page3 => Some(2),
            WizardStep::Result => None,
        }
    }

    fn next(self) -> Self {
        match self {
            WizardStep::Page1 => WizardStep::Page2,
            WizardStep::Page2 => WizardStep::Page3,
            WizardStep::Page3 | WizardStep::Result => WizardStep::Result,
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardStep::Page1 | WizardStep::Page2 => WizardStep::Page1,
            WizardStep::Page3 => WizardStep::Page2,
            WizardStep::Result => WizardStep::Page3,
        }
    }
}

/// Per-user wizard context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSession {
    #[serde(default)]
    pub step: WizardStep,
    #[serde(default)]
    pub answers: [Option<String>; QUESTION_COUNT],
}

#[derive(Debug, Clone, Serialize)]
pub struct PageQuestion {
    pub index: usize,
    pub prompt: &'static str,
    pub options: [&'static str; OPTION_COUNT],
    /// Answer already recorded for this question, if any.
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    /// 1-based page number.
    pub number: usize,
    pub total: usize,
    pub questions: Vec<PageQuestion>,
}

impl WizardSession {
    /// Records the answers for the current page and moves to the next state.
    ///
    /// `choices` are the current page's answers in page order. The session
    /// is unchanged when any of them is missing or invalid.
    pub fn advance<S: AsRef<str>>(&self, choices: &[S]) -> Result<WizardSession, AppError> {
        let page = self.step.page_index().ok_or_else(|| {
            AppError::Validation("The quiz is already complete".to_string())
        })?;
        let questions = PAGES[page];

        if choices.len() != questions.len() {
            return Err(AppError::Validation(format!(
                "Page {} needs {} answers, got {}",
                page + 1,
                questions.len(),
                choices.len()
            )));
        }

        let mut next = self.clone();
        for (&index, choice) in questions.iter().zip(choices) {
            next.answers[index] = Some(resolve_choice(index, choice.as_ref())?.to_string());
        }
        next.step = self.step.next();
        Ok(next)
    }

    /// Returns to the previous page, keeping every recorded answer.
    pub fn back(&self) -> WizardSession {
        WizardSession {
            step: self.step.previous(),
            answers: self.answers.clone(),
        }
    }

    /// The complete, re-validated answers. Only available in `Result`.
    pub fn completed_answers(&self) -> Result<QuizAnswer, AppError> {
        if self.step != WizardStep::Result {
            return Err(AppError::Validation(
                "The quiz is not complete yet".to_string(),
            ));
        }

        let choices = self
            .answers
            .iter()
            .enumerate()
            .map(|(i, a)| {
                a.clone().ok_or_else(|| {
                    AppError::Validation(format!("Question #{} has no answer", i + 1))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        QuizAnswer::collect(&choices)
    }

    /// The questions for the current page, or `None` in `Result`.
    pub fn page_view(&self) -> Option<PageView> {
        let page = self.step.page_index()?;
        Some(PageView {
            number: page + 1,
            total: PAGES.len(),
            questions: PAGES[page]
                .iter()
                .map(|&index| PageQuestion {
                    index,
                    prompt: QUESTIONS[index].prompt,
                    options: QUESTIONS[index].options,
                    selected: self.answers[index].clone(),
                })
                .collect(),
        })
    }
}
