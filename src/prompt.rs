//! Prompt authoring for the generative service.
//!
//! The system prompt fixes the JSON-only output contract; the user message
//! carries the mode, recent turns, body snapshot and the question itself.

use crate::answer::{EvidenceType, INSUFFICIENT_INFORMATION};
use crate::clients::ChatMessage;
use crate::request::AnswerRequest;
use crate::text_bank::Locale;

/// System prompt for the given answer language.
pub fn system_prompt(locale: Locale) -> String {
    let evidence = EvidenceType::ALL
        .iter()
        .map(EvidenceType::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let language = match locale {
        Locale::Ko => "Korean",
        Locale::En => "English",
    };
    [
        "You are the response engine of an advisory (non-diagnostic) counselling and body-tracking assistant.".to_string(),
        "Output exactly one JSON object and nothing else: no greeting, no explanation, no markdown, no code fences.".to_string(),
        "Schema:".to_string(),
        "{".to_string(),
        "  \"summary\": string,".to_string(),
        "  \"top3\": [string, string, string],".to_string(),
        "  \"action\": string,".to_string(),
        "  \"nextQuestion\": string,".to_string(),
        "  \"evidenceType\": string,".to_string(),
        "  \"redFlag\": string,".to_string(),
        "  \"references\": [{\"claim\": string, \"source\": string}]".to_string(),
        "}".to_string(),
        "Rules:".to_string(),
        "- summary: one short, hedged sentence. Never state a diagnosis as fact.".to_string(),
        "- top3: exactly three short possibilities or contributing factors, not diagnoses.".to_string(),
        "- action: one concrete thing to do now, with a number (minutes, hours, times, amount).".to_string(),
        "- nextQuestion: exactly one question, ending with a question mark.".to_string(),
        format!("- evidenceType: one of {evidence}."),
        "- redFlag: urgent warning signs, briefly. If none, leave it empty.".to_string(),
        "- references: at most 2; source is a publication or guideline name and a year only, never a URL, DOI or author.".to_string(),
        format!("If information is missing, use \"{INSUFFICIENT_INFORMATION}\" and ask for that one piece of information in nextQuestion."),
        "Do not repeat safety disclaimers; output only the JSON.".to_string(),
        format!("Write every narrative field in {language}."),
    ]
    .join("\n")
}

/// Truncate to at most `limit` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// User message with the serialized context blocks, each capped at `char_limit`.
pub fn user_message(req: &AnswerRequest, char_limit: usize) -> String {
    let turns = serde_json::to_string(&req.context).unwrap_or_else(|_| "[]".to_string());
    let my_body = serde_json::to_string(&req.my_body).unwrap_or_else(|_| "{}".to_string());
    [
        format!("mode={}", req.mode.as_str()),
        "turns:".to_string(),
        truncate_chars(&turns, char_limit),
        "myBody:".to_string(),
        truncate_chars(&my_body, char_limit),
        "user:".to_string(),
        req.text.clone(),
    ]
    .join("\n")
}

pub fn build_messages(req: &AnswerRequest, locale: Locale, char_limit: usize) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(locale)),
        ChatMessage::user(user_message(req, char_limit)),
    ]
}
