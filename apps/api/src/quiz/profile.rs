//! Profile Compiler — turns validated answers into the generation prompt.
//!
//! Pure string construction: the same answers and theme always produce the
//! same prompt. No validation happens here; `QuizAnswer` already guarantees
//! five known options in question order.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, STATS_RANGE_INSTRUCTION};
use crate::quiz::questions::QuizAnswer;
use crate::quiz::theme::Theme;

/// The newline-joined answers, in question order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile(String);

impl Profile {
    pub fn from_answers(answers: &QuizAnswer) -> Self {
        Profile(answers.as_slice().join("\n"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Renders the theme's stats schema, e.g. `{"毁灭欲": int, "掌控力": int, ...}`.
fn stats_schema(theme: Theme) -> String {
    let fields = theme
        .stat_axes()
        .iter()
        .map(|axis| format!("\"{axis}\": int"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{fields}}}")
}

/// Builds the full prompt for one reading.
pub fn compile(theme: Theme, answers: &QuizAnswer) -> String {
    let profile = Profile::from_answers(answers);

    theme
        .prompt_template()
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{stats_range_instruction}", STATS_RANGE_INSTRUCTION)
        .replace("{stats_schema}", &stats_schema(theme))
        .replace("{profile}", profile.as_str())
}
