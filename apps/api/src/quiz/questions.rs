//! Answer Collector — the fixed question set and validated answer sequences.

use serde::Serialize;

use crate::errors::AppError;

pub const QUESTION_COUNT: usize = 5;
pub const OPTION_COUNT: usize = 3;

/// Option labels, in option order.
const LABELS: [char; OPTION_COUNT] = ['A', 'B', 'C'];

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; OPTION_COUNT],
}

pub static QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        prompt: "1. 暴风雨夜，全世界电力切断。作为幸存者，你的第一反应是？",
        options: [
            "A. 建立绝对防御圈（生存优先）",
            "B. 组建互助联盟（社交优先）",
            "C. 记录这一切混乱（观察者）",
        ],
    },
    Question {
        prompt: "2. 在名利场晚宴上，最让你感到不适的是？",
        options: [
            "A. 低效的寒暄（厌恶低效）",
            "B. 满场的虚伪（厌恶谎言）",
            "C. 无人关注（渴望聚光灯）",
        ],
    },
    Question {
        prompt: "3. 必须获得一种禁忌能力，你选择？",
        options: [
            "A. 读心术：洞察一切谎言",
            "B. 预知未来：绝对正确的决策",
            "C. 隐形：随心所欲的自由",
        ],
    },
    Question {
        prompt: "4. 面对愚蠢权威的发号施令，你会？",
        options: [
            "A. 当面处刑，指出逻辑漏洞",
            "B. 表面顺从，幕后操纵走向",
            "C. 转身离开，不与傻瓜论长短",
        ],
    },
    Question {
        prompt: "5. 你认为世界的本质是？",
        options: [
            "A. 弱肉强食的狩猎场",
            "B. 精密冰冷的数据程序",
            "C. 一场荒诞好笑的戏剧",
        ],
    },
];

/// Resolves a user choice for question `index` to the canonical option text.
///
/// Accepts the full option text or its letter label (`A`/`B`/`C`, any case).
pub fn resolve_choice(index: usize, choice: &str) -> Result<&'static str, AppError> {
    let question = QUESTIONS
        .get(index)
        .ok_or_else(|| AppError::Validation(format!("No question #{}", index + 1)))?;
    let choice = choice.trim();

    if choice.is_empty() {
        return Err(AppError::Validation(format!(
            "Question #{} has no answer",
            index + 1
        )));
    }

    if let Some(option) = question.options.iter().find(|o| **o == choice) {
        return Ok(*option);
    }

    let mut chars = choice.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(pos) = LABELS.iter().position(|l| l.eq_ignore_ascii_case(&c)) {
            return Ok(question.options[pos]);
        }
    }

    Err(AppError::Validation(format!(
        "'{}' is not an option of question #{}",
        choice,
        index + 1
    )))
}

/// One complete, validated answer per question, in question order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer([String; QUESTION_COUNT]);

impl QuizAnswer {
    /// Validates raw choices (full option text or letter labels) in question order.
    pub fn collect<S: AsRef<str>>(choices: &[S]) -> Result<Self, AppError> {
        if choices.len() != QUESTION_COUNT {
            return Err(AppError::Validation(format!(
                "Expected {} answers, got {}",
                QUESTION_COUNT,
                choices.len()
            )));
        }

        let resolved = choices
            .iter()
            .enumerate()
            .map(|(i, c)| resolve_choice(i, c.as_ref()).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;

        let answers: [String; QUESTION_COUNT] = resolved.try_into().map_err(|_| {
            AppError::Internal(anyhow::anyhow!("answer count changed during resolution"))
        })?;

        Ok(QuizAnswer(answers))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
