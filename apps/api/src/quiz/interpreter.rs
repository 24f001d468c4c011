//! Response Interpreter — turns raw model text into an `ArchetypeResult`.
//!
//! The model's output is untrusted. Once the text parses as a JSON object,
//! decoding is total: every missing or mistyped field falls back to its
//! declared default. Only unparseable text is an error.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Field names requested from the model, in prompt order.
pub const FIELD_NAMES: [&str; 8] = [
    "animal",
    "keywords",
    "quote",
    "analysis",
    "mask",
    "shadow",
    "stats",
    "image_prompt",
];

/// Score used when the model reports a non-numeric trait value.
pub const NEUTRAL_SCORE: u8 = 50;
pub const MAX_SCORE: u8 = 100;

/// The model's output could not be parsed as an archetype object.
#[derive(Debug, Error)]
pub enum MalformedResponse {
    #[error("model returned no content")]
    Empty,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// The generated soul animal. Every field has a declared default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchetypeResult {
    pub animal: String,
    pub keywords: Vec<String>,
    pub quote: String,
    pub analysis: String,
    pub mask: String,
    pub shadow: String,
    /// Trait axis → score, clamped to 0..=100.
    pub stats: BTreeMap<String, u8>,
    pub image_prompt: String,
}

/// Strips surrounding whitespace and a leading ```json / ``` plus trailing ``` fence.
pub fn sanitize(raw: &str) -> &str {
    let mut text = raw.trim();

    if text.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("```json")) {
        text = &text[7..];
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }

    let text = text.trim_start();
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Sanitizes, parses and decodes raw model output.
pub fn interpret(raw: &str) -> Result<ArchetypeResult, MalformedResponse> {
    let text = sanitize(raw);
    if text.is_empty() {
        return Err(MalformedResponse::Empty);
    }

    match serde_json::from_str::<Value>(text)? {
        Value::Object(object) => Ok(decode(&object)),
        other => Err(MalformedResponse::NotAnObject(json_kind(&other))),
    }
}

/// Total mapping from any JSON object to an archetype.
pub fn decode(object: &Map<String, Value>) -> ArchetypeResult {
    let unexpected: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !FIELD_NAMES.contains(key))
        .collect();
    if !unexpected.is_empty() {
        debug!("Ignoring unexpected fields in model output: {:?}", unexpected);
    }

    ArchetypeResult {
        animal: text_field(object, "animal"),
        keywords: keywords_field(object),
        quote: text_field(object, "quote"),
        analysis: text_field(object, "analysis"),
        mask: text_field(object, "mask"),
        shadow: text_field(object, "shadow"),
        stats: stats_field(object),
        image_prompt: text_field(object, "image_prompt"),
    }
}

/// Coerces one reported trait value into 0..=100.
/// Floats round, numeric strings parse, anything else is `NEUTRAL_SCORE`.
pub fn normalize_score(value: &Value) -> u8 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => n.round().clamp(0.0, f64::from(MAX_SCORE)) as u8,
        _ => NEUTRAL_SCORE,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    object.get(key).and_then(scalar_text).unwrap_or_default()
}

fn keywords_field(object: &Map<String, Value>) -> Vec<String> {
    match object.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_boolean())
            .filter_map(scalar_text)
            .filter(|k| !k.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn stats_field(object: &Map<String, Value>) -> BTreeMap<String, u8> {
    match object.get("stats") {
        Some(Value::Object(stats)) => stats
            .iter()
            .map(|(axis, value)| (axis.clone(), normalize_score(value)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
