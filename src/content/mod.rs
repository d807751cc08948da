//! One module per content type: the prompt, the draft shape the model is
//! asked for, the mapping to a stored record, and the fallback dataset served
//! when generation fails.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod daily_gk;
pub mod evaluation;
pub mod idioms;
pub mod news;
pub mod practice;
pub mod quiz;
pub mod vocabulary;

/// `value` unless it is missing or blank.
pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Accept `"a"`, `["a", "b"]` or `null` as a list of strings.
pub fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(items) => items.into_iter().filter_map(value_to_string).collect(),
        other => vec![other.to_string()],
    })
}

/// Accept a list of strings or an object of labelled strings (`{"A": "..", "B": ".."}`),
/// taking the object's values in key order.
pub fn list_or_map<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(value_to_string).collect(),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries.into_iter().filter_map(|(_, v)| value_to_string(v)).collect()
        }
        _ => Vec::new(),
    })
}

/// Accept integral, fractional or quoted numbers ("7", 7.6) as a rounded score.
pub fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    number
        .map(|n| n.round().clamp(0.0, u8::MAX as f64) as u8)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a numeric score, got {value}")))
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
