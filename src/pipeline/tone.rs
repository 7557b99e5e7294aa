//! Hedged-register enforcement for the narrative `summary` field.
//!
//! Disallowed nouns are stripped to a fixed point, then a closed substitution
//! table is applied in one pass so replacements never feed back into matching.
//! No replacement contains a pattern or a disallowed noun, which keeps `soften`
//! idempotent.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// (pattern, replacement, match on word boundaries). Longer patterns first.
const HEDGES: &[(&str, &str, bool)] = &[
    ("is caused by", "may be linked to", true),
    ("are caused by", "may be linked to", true),
    ("is a sign of", "often appears with", true),
    ("definitely", "possibly", true),
    ("certainly", "likely", true),
    ("clearly", "possibly", true),
    ("confirmed", "suggested", true),
    ("determined", "indicated", true),
    ("always", "often", true),
    ("must", "could", true),
    ("will", "may", true),
    ("is", "may be", true),
    ("are", "may be", true),
    ("때문입니다", "때문일 수 있어요", false),
    ("확실합니다", "가능성이 있어요", false),
    ("진단됩니다", "보일 수 있어요", false),
    ("입니다", "일 수 있어요", false),
    ("확실히", "아마", false),
    ("확정", "추정", false),
];

static HEDGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = HEDGES
        .iter()
        .map(|(pattern, _, bounded)| {
            let escaped = regex::escape(pattern);
            if *bounded {
                format!(r"\b{escaped}\b")
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){alternation}")).expect("hedge regex should compile")
});

static HEDGE_MAP: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    HEDGES
        .iter()
        .map(|(pattern, replacement, _)| (pattern.to_lowercase(), *replacement))
        .collect()
});

// Vague abstractions the advisory voice avoids.
static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:flow|state|signal|pattern)s?\b|(?:기운|파동)(?:이|가|을|를|의|은|는)?")
        .expect("disallowed-noun regex should compile")
});

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?;:])").expect("punctuation regex should compile"));

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if starts_upper => first.to_uppercase().chain(chars).collect(),
        _ => replacement.to_string(),
    }
}

/// Strip until nothing matches; removing an inner noun can join its
/// neighbours into a new one (`기파동운` becomes `기운`).
fn strip_disallowed(mut text: String) -> String {
    loop {
        let next = DISALLOWED_RE.replace_all(&text, "").into_owned();
        if next == text {
            return text;
        }
        text = next;
    }
}

/// Apply the substitution table and strip disallowed nouns.
///
/// May return an empty string; see [`sanitize_summary`].
pub fn soften(text: &str) -> String {
    let normalized: String = text.nfc().collect();
    let collapsed = collapse_whitespace(&normalized);

    // Strip first: removing a noun must not splice together a new hedge pattern.
    let stripped = strip_disallowed(collapsed);
    let hedged = HEDGE_RE.replace_all(&stripped, |caps: &regex::Captures| {
        let matched = &caps[0];
        match HEDGE_MAP.get(&matched.to_lowercase()) {
            Some(replacement) => match_case(matched, replacement),
            None => matched.to_string(),
        }
    });

    let tidy = collapse_whitespace(&hedged);
    let tidy = SPACE_BEFORE_PUNCT_RE.replace_all(&tidy, "$1");
    tidy.trim_start_matches(|c: char| matches!(c, ',' | ';' | ':') || c.is_whitespace())
        .trim()
        .to_string()
}

/// `soften`, or `None` when nothing meaningful is left and the caller has to
/// substitute the neutral sentence.
pub fn sanitize_summary(text: &str) -> Option<String> {
    let softened = soften(text);
    (!is_blank(&softened)).then_some(softened)
}

/// True when the text carries no letters or digits.
pub fn is_blank(text: &str) -> bool {
    !text.chars().any(char::is_alphanumeric)
}
