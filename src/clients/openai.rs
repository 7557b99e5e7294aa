use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::clients::traits::{ChatMessage, CompletionClient, CompletionError};
use crate::config::CompletionConfig;

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    timeout_ms: u64,
}

impl OpenAiClient {
    pub fn new(cfg: &CompletionConfig, api_key: Option<String>) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| CompletionError::Http(format!("build http client: {e}")))?;
        Ok(Self {
            http,
            api_key,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            timeout_ms: cfg.timeout_ms,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, messages: &[ChatMessage]) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": messages,
        })
    }
}

/// First choice's message content, trimmed.
pub fn completion_text(response: &Value) -> Result<String, CompletionError> {
    let text = response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .unwrap_or("");
    if text.is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    CompletionError::Http(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let v: Value = resp
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;
        let text = completion_text(&v)?;
        tracing::debug!(model = %self.model, chars = text.len(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let v = json!({"choices": [{"message": {"role": "assistant", "content": "  {\"a\":1}  "}}]});
        assert_eq!(completion_text(&v).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn empty_or_missing_content_is_an_error() {
        for v in [
            json!({"choices": []}),
            json!({"choices": [{"message": {"content": "   "}}]}),
            json!({}),
        ] {
            assert!(matches!(completion_text(&v), Err(CompletionError::EmptyResponse)));
        }
    }

    #[test]
    fn request_body_carries_model_and_messages() {
        let client = OpenAiClient::new(&CompletionConfig::default(), None).unwrap();
        let body = client.request_body(&[ChatMessage::system("sys"), ChatMessage::user("hi")]);
        assert_eq!(body["model"], "gpt-5");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = OpenAiClient::new(&CompletionConfig::default(), None).unwrap();
        let err = client.complete(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, CompletionError::MissingApiKey));
    }
}
