//! Closed-vocabulary and punctuation contracts, applied field by field.

use crate::answer::{EvidenceType, INSUFFICIENT_INFORMATION, TOP3_LEN};
use crate::text_bank::TextBank;

/// Unknown labels get the conservative vetted default; absent ones are the user's own input.
pub fn evidence_type(raw: &str) -> EvidenceType {
    if raw.trim().is_empty() {
        return EvidenceType::UserInput;
    }
    EvidenceType::from_label(raw).unwrap_or_else(|| {
        tracing::debug!(label = raw, "evidence type outside vocabulary");
        EvidenceType::ExpertConsensus
    })
}

/// Exactly one question, always ending in `?`.
pub fn next_question(raw: &str, bank: &TextBank) -> String {
    let raw = raw.trim().replace('？', "?");
    if raw.is_empty() {
        return bank.default_question.to_string();
    }
    match raw.find('?') {
        Some(idx) => raw[..=idx].to_string(),
        None => format!("{raw}?"),
    }
}

pub fn red_flag(raw: &str, bank: &TextBank) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        bank.no_red_flag.to_string()
    } else {
        raw.to_string()
    }
}

/// Pad to exactly three entries with the insufficient-information sentinel.
pub fn pad_top3(items: &[String]) -> [String; TOP3_LEN] {
    std::array::from_fn(|i| {
        items
            .get(i)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(INSUFFICIENT_INFORMATION)
            .to_string()
    })
}
