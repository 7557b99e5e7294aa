//! Lenient parsing of the incoming answer request.
//!
//! Bodies arrive either as a JSON object or as a JSON string wrapping one;
//! anything unparsable is treated as an empty object so the only hard
//! failure is a missing `text`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AnswerError, Result};
use crate::text_bank::Mode;

const QUESTION_KEYS: &[&str] = &["question", "q"];
const ANSWER_KEYS: &[&str] = &["priorAnswer", "aJson", "aHtml", "answer", "a"];

/// One prior exchange forwarded as context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub question: String,
    pub prior_answer: Value,
}

/// Most recent turns, oldest first, bounded by the configured window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConversationContext {
    turns: Vec<ConversationTurn>,
}

impl ConversationContext {
    pub fn from_value(value: Option<&Value>, window: usize) -> Self {
        let Some(Value::Array(items)) = value else {
            return Self::default();
        };
        let turns: Vec<ConversationTurn> = items
            .iter()
            .filter_map(|item| item.as_object().and_then(turn_from_object))
            .collect();
        let skip = turns.len().saturating_sub(window);
        Self {
            turns: turns.into_iter().skip(skip).collect(),
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

fn turn_from_object(obj: &Map<String, Value>) -> Option<ConversationTurn> {
    let question = QUESTION_KEYS
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|q| !q.is_empty())?
        .to_string();
    let prior_answer = ANSWER_KEYS
        .iter()
        .find_map(|key| obj.get(*key))
        .cloned()
        .unwrap_or(Value::Null);
    Some(ConversationTurn {
        question,
        prior_answer,
    })
}

/// A parsed request for one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRequest {
    pub mode: Mode,
    pub text: String,
    pub context: ConversationContext,
    /// Free-form body-metrics snapshot from the My Body surface.
    pub my_body: Value,
}

/// Scalars are stringified the way a loosely-typed client would expect.
fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

impl AnswerRequest {
    pub fn from_body(body: &[u8], turn_window: usize) -> Result<Self> {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(Value::String(inner)) => {
                serde_json::from_str::<Value>(&inner).unwrap_or(Value::Null)
            }
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "request body is not JSON");
                Value::Null
            }
        };
        Self::from_value(&value, turn_window)
    }

    pub fn from_value(value: &Value, turn_window: usize) -> Result<Self> {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        let text = scalar_text(obj.get("text"));
        if text.is_empty() {
            return Err(AnswerError::invalid_request("Missing text"));
        }

        let mode = match scalar_text(obj.get("mode")) {
            m if m.is_empty() => Mode::default(),
            m => Mode::parse(&m),
        };

        let my_body = match obj.get("myBody") {
            Some(v @ Value::Object(_)) => v.clone(),
            _ => Value::Object(Map::new()),
        };

        Ok(Self {
            mode,
            text,
            context: ConversationContext::from_value(obj.get("turns"), turn_window),
            my_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object_body() {
        let body = br#"{"mode":"mybody","text":"  tired  ","myBody":{"sleep":5}}"#;
        let req = AnswerRequest::from_body(body, 12).unwrap();
        assert_eq!(req.mode, Mode::MyBody);
        assert_eq!(req.text, "tired");
        assert_eq!(req.my_body, json!({"sleep": 5}));
        assert!(req.context.is_empty());
    }

    #[test]
    fn parses_string_wrapped_body() {
        let body = serde_json::to_vec(&json!("{\"text\":\"hello\"}")).unwrap();
        let req = AnswerRequest::from_body(&body, 12).unwrap();
        assert_eq!(req.text, "hello");
        assert_eq!(req.mode, Mode::Counsel);
    }

    #[test]
    fn missing_or_blank_text_is_rejected() {
        let bodies: [&[u8]; 4] = [b"{}", b"{\"text\":\"   \"}", b"not json", b""];
        for body in bodies {
            let err = AnswerRequest::from_body(body, 12).unwrap_err();
            assert!(matches!(err, AnswerError::InvalidRequest { .. }));
        }
    }

    #[test]
    fn turns_keep_only_the_latest_window() {
        let turns: Vec<Value> = (0..15)
            .map(|i| json!({"q": format!("question {i}"), "aJson": {"summary": i}}))
            .collect();
        let ctx = ConversationContext::from_value(Some(&Value::Array(turns)), 12);
        assert_eq!(ctx.len(), 12);
        assert_eq!(ctx.turns()[0].question, "question 3");
        assert_eq!(ctx.turns()[11].prior_answer, json!({"summary": 14}));
    }

    #[test]
    fn turns_without_questions_are_dropped() {
        let turns = json!([
            {"q": "first"},
            {"aHtml": "<p>orphan</p>"},
            "not an object",
            {"question": "second", "priorAnswer": "ok"}
        ]);
        let ctx = ConversationContext::from_value(Some(&turns), 12);
        let questions: Vec<&str> = ctx.turns().iter().map(|t| t.question.as_str()).collect();
        assert_eq!(questions, vec!["first", "second"]);
        assert_eq!(ctx.turns()[0].prior_answer, Value::Null);
    }

    #[test]
    fn numeric_text_is_stringified() {
        let req = AnswerRequest::from_value(&json!({"text": 42, "mode": 7}), 12).unwrap();
        assert_eq!(req.text, "42");
        assert_eq!(req.mode, Mode::Counsel);
    }
}
