//! Missing-field tracking and canned-answer synthesis.

use crate::answer::{Answer, EvidenceType, INSUFFICIENT_INFORMATION, Meta, MissingField};
use crate::pipeline::coerce::RawFields;
use crate::text_bank::TextBank;

/// Required fields that were empty before their local default, in schema order.
///
/// `summary_blank` reflects the summary after tone sanitizing, since stripping
/// can empty an otherwise present summary.
pub fn track_missing(raw: &RawFields, summary_blank: bool) -> Vec<MissingField> {
    [
        (MissingField::Summary, summary_blank),
        (MissingField::Top3, raw.top3.is_empty()),
        (MissingField::Action, raw.action.is_empty()),
        (MissingField::NextQuestion, raw.next_question.is_empty()),
        (MissingField::EvidenceType, raw.evidence_type.is_empty()),
    ]
    .into_iter()
    .filter_map(|(field, missing)| missing.then_some(field))
    .collect()
}

/// Fully canned answer for when nothing structured could be recovered.
pub fn canned_answer(bank: &TextBank, mut meta: Meta) -> Answer {
    meta.missing = vec![MissingField::All];
    Answer {
        summary: bank.canned.summary.to_string(),
        top3: std::array::from_fn(|_| INSUFFICIENT_INFORMATION.to_string()),
        action: bank.canned.action.to_string(),
        next_question: bank.canned.next_question.to_string(),
        evidence_type: EvidenceType::UserInput,
        red_flag: bank.no_red_flag.to_string(),
        references: Vec::new(),
        meta,
    }
}

/// Fill the missing narrative fields from one coherent bundle.
///
/// Only fields listed in `meta.missing` are replaced; whatever the model did
/// supply is kept, as are `top3`, `redFlag` and `references`.
pub fn apply_holistic(answer: &mut Answer, bank: &TextBank) {
    let missing = answer.meta.missing.clone();
    for field in missing {
        match field {
            MissingField::Summary => answer.summary = bank.holistic.summary.to_string(),
            MissingField::Action => answer.action = bank.holistic.action.to_string(),
            MissingField::NextQuestion => {
                answer.next_question = bank.holistic.next_question.to_string()
            }
            MissingField::EvidenceType => answer.evidence_type = EvidenceType::UserInput,
            MissingField::Top3 | MissingField::All => {}
        }
    }
}
