//! Map loosely-shaped JSON onto the canonical answer fields.
//!
//! Nothing here applies defaults; empty strings and short `top3` lists flow on
//! to the validator and the missing-field tracker.

use serde_json::{Map, Value};

use crate::answer::TOP3_LEN;

/// Canonical fields as pulled from the raw object, before any defaulting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    pub summary: String,
    /// 0 to 3 non-empty entries.
    pub top3: Vec<String>,
    pub action: String,
    pub next_question: String,
    pub evidence_type: String,
    pub red_flag: String,
}

/// Trimmed string for string values, empty for everything else.
pub fn pick_str(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Up to three non-empty entries from a list or a comma-delimited string.
pub fn pick_top3(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| pick_str(Some(item)))
            .filter(|s| !s.is_empty())
            .take(TOP3_LEN)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(TOP3_LEN)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Look up `key`, falling back to its snake_case spelling.
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| obj.get(alias))
}

pub fn coerce_fields(obj: &Map<String, Value>) -> RawFields {
    RawFields {
        summary: pick_str(obj.get("summary")),
        top3: pick_top3(field(obj, "top3", "top_3")),
        action: pick_str(obj.get("action")),
        next_question: pick_str(field(obj, "nextQuestion", "next_question")),
        evidence_type: pick_str(field(obj, "evidenceType", "evidence_type")),
        red_flag: pick_str(field(obj, "redFlag", "red_flag")),
    }
}
