//! Normalization pipeline: raw completion text in, schema-complete [`Answer`] out.
//!
//! Extraction, coercion, tone sanitizing, reference formatting, validation and
//! fallback synthesis are all total. Nothing here returns an error or touches
//! I/O; the only shared state is the immutable [`PipelineConfig`].

pub mod coerce;
pub mod extract;
pub mod fallback;
pub mod references;
pub mod tone;
pub mod validate;

use serde_json::{Map, Value};

use crate::answer::{Answer, Meta, MissingField};
use crate::config::PipelineConfig;
use crate::text_bank::{Mode, TextBank};

/// Request details that only personalize canned text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackContext {
    pub mode: Mode,
}

impl FallbackContext {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

/// Owns the process-wide pipeline configuration; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: PipelineConfig,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn bank(&self, ctx: &FallbackContext) -> &'static TextBank {
        TextBank::get(self.config.language, ctx.mode)
    }

    fn meta(&self, missing: Vec<MissingField>) -> Meta {
        Meta {
            version: self.config.schema_version.clone(),
            language: self.config.language.as_str().to_string(),
            missing,
        }
    }

    /// Normalize a raw completion with default (counsel) fallback text.
    pub fn normalize(&self, raw: &str) -> Answer {
        self.normalize_with(raw, &FallbackContext::default())
    }

    pub fn normalize_with(&self, raw: &str, ctx: &FallbackContext) -> Answer {
        match extract::extract_object(raw) {
            Some(obj) => self.normalize_object(&obj, ctx),
            None => {
                tracing::debug!(len = raw.len(), "no structured data in completion, using canned answer");
                fallback::canned_answer(self.bank(ctx), self.meta(Vec::new()))
            }
        }
    }

    /// Normalize an already-parsed object, skipping extraction.
    pub fn normalize_object(&self, obj: &Map<String, Value>, ctx: &FallbackContext) -> Answer {
        let bank = self.bank(ctx);
        let raw = coerce::coerce_fields(obj);

        let summary = tone::sanitize_summary(&raw.summary);
        let missing = fallback::track_missing(&raw, summary.is_none());

        let mut answer = Answer {
            summary: summary.unwrap_or_else(|| bank.neutral_summary.to_string()),
            top3: validate::pad_top3(&raw.top3),
            action: if raw.action.is_empty() {
                bank.default_action.to_string()
            } else {
                raw.action.clone()
            },
            next_question: validate::next_question(&raw.next_question, bank),
            evidence_type: validate::evidence_type(&raw.evidence_type),
            red_flag: validate::red_flag(&raw.red_flag, bank),
            references: references::format_references(
                obj.get("references"),
                self.config.max_references,
            ),
            meta: self.meta(missing),
        };

        if answer.meta.missing.len() >= self.config.missing_threshold {
            tracing::warn!(
                missing = answer.meta.missing.len(),
                threshold = self.config.missing_threshold,
                "too many required fields missing, applying holistic fallback"
            );
            fallback::apply_holistic(&mut answer, bank);
        } else if !answer.meta.missing.is_empty() {
            tracing::debug!(missing = ?answer.meta.missing, "defaulted missing fields");
        }

        answer
    }

    /// Canned answer handed back when the generative service could not be reached.
    pub fn transport_fallback(&self, ctx: &FallbackContext) -> Answer {
        fallback::canned_answer(self.bank(ctx), self.meta(Vec::new()))
    }
}
