//! Lenient decoding of dataset cells.
//!
//! Spreadsheet exports mix numbers, numeric strings, blanks and dash
//! placeholders in the same column. Everything that is not a usable number
//! decodes to `None`.

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::constants::MISSING_MARKERS;

/// Parse a score written as text. Placeholders and non-finite values are `None`.
pub fn parse_score_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Interpret a raw JSON cell as a score.
pub fn score_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_score_text(s),
        _ => None,
    }
}

/// Interpret a raw JSON cell as a positive rank.
pub fn rank_from_value(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_score_text(s)?,
        _ => return None,
    };
    if n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
        Some(n as u32)
    } else {
        None
    }
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn de_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    let score = score_from_value(&value);
    if score.is_none() {
        if let Value::String(s) = &value {
            if !MISSING_MARKERS.contains(&s.trim()) {
                warn!("Unparseable score cell `{s}`, treating as missing");
            }
        }
    }
    Ok(score)
}

pub(crate) fn de_rank<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(rank_from_value(&value))
}

pub(crate) fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(text_from_value(&value))
}

pub(crate) fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_text(deserializer)?.unwrap_or_default())
}
