//! Recover a JSON object from whatever text the generative service produced.

use serde_json::{Map, Value};

/// Remove a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the optional tag (```json, ```JSON, ```javascript ...) up to the first newline.
    let is_tag = |tag: &str| {
        tag.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
    };
    let rest = match rest.find('\n') {
        Some(nl) if is_tag(&rest[..nl]) => &rest[nl + 1..],
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Extract the first usable JSON object from `raw`.
///
/// Returns `None` when nothing structured can be recovered. The brace slice is
/// a best effort: it spans the first `{` to the last `}` without balancing.
pub fn extract_object(raw: &str) -> Option<Map<String, Value>> {
    if raw.trim().is_empty() {
        return None;
    }

    let clean = strip_code_fence(raw);
    if let Some(map) = parse_object(clean) {
        return Some(map);
    }

    let start = clean.find('{')?;
    let end = clean.rfind('}')?;
    if start >= end {
        tracing::debug!("no balanced brace span in completion text");
        return None;
    }
    let found = parse_object(&clean[start..=end]);
    if found.is_none() {
        tracing::debug!(len = raw.len(), "brace span did not parse as a JSON object");
    }
    found
}
