//! Themes — the deployment-time choice of persona, trait axes and image style.
//!
//! A theme never depends on the user's answers. It is read once from config
//! and shared by every reading the process serves.

use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::quiz::prompts::{BASILISK_PROMPT_TEMPLATE, ETHEREAL_PROMPT_TEMPLATE};

/// Number of named trait axes in every theme's `stats` schema.
pub const AXIS_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Dark psychologist framing, Rococo dark fantasy imagery.
    #[default]
    Basilisk,
    /// Gentle healer framing, soft dreamlike imagery.
    Ethereal,
}

impl Theme {
    /// Names of the trait axes the model must score, in radar order.
    pub fn stat_axes(self) -> &'static [&'static str; AXIS_COUNT] {
        match self {
            Theme::Basilisk => &["毁灭欲", "掌控力", "孤独感", "理智", "伪装", "洞察力"],
            Theme::Ethereal => &["温柔", "治愈力", "灵性", "勇气", "共情", "纯净"],
        }
    }

    pub fn prompt_template(self) -> &'static str {
        match self {
            Theme::Basilisk => BASILISK_PROMPT_TEMPLATE,
            Theme::Ethereal => ETHEREAL_PROMPT_TEMPLATE,
        }
    }

    /// Style keywords appended to the model's image prompt before rendering.
    pub fn image_style(self) -> &'static str {
        match self {
            Theme::Basilisk => {
                "rococo dark fantasy, ornate gold filigree, baroque frame, chiaroscuro lighting, highly detailed"
            }
            Theme::Ethereal => {
                "ethereal dreamy watercolor, soft glowing light, pastel palette, gentle mist, highly detailed"
            }
        }
    }

    /// Title shown when the model did not name an animal.
    pub fn unnamed_title(self) -> &'static str {
        match self {
            Theme::Basilisk => "无名之兽",
            Theme::Ethereal => "未显形的精灵",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basilisk" | "dark" => Ok(Theme::Basilisk),
            "ethereal" | "healing" => Ok(Theme::Ethereal),
            other => bail!("Unknown theme '{other}'"),
        }
    }
}
