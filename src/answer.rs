//! The user-facing structured answer and its closed vocabularies.

use serde::{Deserialize, Serialize};

/// Filler for `top3` slots the generative service left empty.
pub const INSUFFICIENT_INFORMATION: &str = "insufficient-information";

/// Number of entries `top3` always carries.
pub const TOP3_LEN: usize = 3;

/// Line break plus em-dash that separates a reference claim from its source.
pub const REFERENCE_MARKER: &str = "\n— ";

/// Finalized, schema-complete answer returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub summary: String,
    pub top3: [String; TOP3_LEN],
    pub action: String,
    pub next_question: String,
    pub evidence_type: EvidenceType,
    pub red_flag: String,
    pub references: Vec<String>,
    pub meta: Meta,
}

/// Observability record attached to every answer; not rendered as content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub version: String,
    #[serde(alias = "lang")]
    pub language: String,
    pub missing: Vec<MissingField>,
}

/// Names recorded in `meta.missing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingField {
    /// Nothing structured could be recovered at all.
    All,
    Summary,
    Top3,
    Action,
    NextQuestion,
    EvidenceType,
}

impl MissingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingField::All => "all",
            MissingField::Summary => "summary",
            MissingField::Top3 => "top3",
            MissingField::Action => "action",
            MissingField::NextQuestion => "nextQuestion",
            MissingField::EvidenceType => "evidenceType",
        }
    }
}

/// Closed classification of an answer's epistemic basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceType {
    UserInput,
    GeneralPhysiology,
    ExpertConsensus,
    Guideline,
    Research,
}

impl EvidenceType {
    pub const ALL: [EvidenceType; 5] = [
        EvidenceType::UserInput,
        EvidenceType::GeneralPhysiology,
        EvidenceType::ExpertConsensus,
        EvidenceType::Guideline,
        EvidenceType::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceType::UserInput => "user-input",
            EvidenceType::GeneralPhysiology => "general-physiology",
            EvidenceType::ExpertConsensus => "expert-consensus",
            EvidenceType::Guideline => "guideline",
            EvidenceType::Research => "research",
        }
    }

    /// Resolve a free-form label onto the vocabulary.
    ///
    /// Matching ignores case, surrounding whitespace, and `_`/space versus `-`,
    /// and accepts the Korean labels the prompt historically used. Returns
    /// `None` for anything else.
    pub fn from_label(raw: &str) -> Option<Self> {
        let label: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
            .collect();
        match label.as_str() {
            "user-input" | "사용자입력" | "사용자-입력" => Some(EvidenceType::UserInput),
            "general-physiology" | "일반생리" | "일반-생리" => {
                Some(EvidenceType::GeneralPhysiology)
            }
            "expert-consensus" | "전문가합의" | "전문가-합의" => {
                Some(EvidenceType::ExpertConsensus)
            }
            "guideline" | "guidelines" | "가이드라인" => Some(EvidenceType::Guideline),
            "research" | "연구" => Some(EvidenceType::Research),
            _ => None,
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evidence_labels_resolve_case_and_separator_insensitively() {
        assert_eq!(
            EvidenceType::from_label(" Expert_Consensus "),
            Some(EvidenceType::ExpertConsensus)
        );
        assert_eq!(
            EvidenceType::from_label("general physiology"),
            Some(EvidenceType::GeneralPhysiology)
        );
        assert_eq!(EvidenceType::from_label("연구"), Some(EvidenceType::Research));
        assert_eq!(EvidenceType::from_label("anecdote"), None);
    }

    #[test]
    fn every_variant_round_trips_through_its_label() {
        for ty in EvidenceType::ALL {
            assert_eq!(EvidenceType::from_label(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn answer_serializes_with_camel_case_keys() {
        let answer = Answer {
            summary: "s".into(),
            top3: ["a".into(), "b".into(), "c".into()],
            action: "a".into(),
            next_question: "q?".into(),
            evidence_type: EvidenceType::UserInput,
            red_flag: "none".into(),
            references: vec![],
            meta: Meta {
                version: "v".into(),
                language: "ko".into(),
                missing: vec![MissingField::NextQuestion, MissingField::All],
            },
        };
        let v = serde_json::to_value(&answer).unwrap();
        assert_eq!(v["nextQuestion"], json!("q?"));
        assert_eq!(v["evidenceType"], json!("user-input"));
        assert_eq!(v["redFlag"], json!("none"));
        assert_eq!(v["meta"]["missing"], json!(["nextQuestion", "all"]));
    }
}
