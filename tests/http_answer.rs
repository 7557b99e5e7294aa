//! Integration tests for the answer endpoint with a stubbed generative service.

use std::sync::{Arc, Mutex};

use answer_normalizer::Config;
use answer_normalizer::clients::{ChatMessage, CompletionClient, CompletionError};
use answer_normalizer::http::{AppState, router};
use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

enum Reply {
    Text(&'static str),
    Fail,
}

struct StubClient {
    reply: Reply,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubClient {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail => Err(CompletionError::Timeout { timeout_ms: 10 }),
        }
    }
}

fn app(client: Arc<StubClient>) -> axum::Router {
    let client: Arc<dyn CompletionClient> = client;
    router(AppState::new(&Config::default(), client))
}

async fn send(app: axum::Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn answers_with_normalized_json() {
    let stub = StubClient::new(Reply::Text(
        "```json\n{\"summary\":\"수면 부족일 가능성이 있어요\",\"top3\":[\"수면\"],\"action\":\"오늘 30분 일찍 자기\",\"nextQuestion\":\"어젯밤 몇 시간 잤어\",\"evidenceType\":\"general-physiology\"}\n```",
    ));
    let (status, body) = send(
        app(stub.clone()),
        "POST",
        "/api/answer",
        r#"{"mode":"counsel","text":"요즘 피곤해"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let answer = &body["answer"];
    assert_eq!(answer["summary"], "수면 부족일 가능성이 있어요");
    assert_eq!(answer["top3"].as_array().unwrap().len(), 3);
    assert_eq!(answer["top3"][2], "insufficient-information");
    assert_eq!(answer["nextQuestion"], "어젯밤 몇 시간 잤어?");
    assert_eq!(answer["evidenceType"], "general-physiology");
    assert_eq!(answer["meta"]["version"], "answer-json-v2");

    let seen = stub.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0][1].content.starts_with("mode=counsel"));
    assert!(seen[0][1].content.ends_with("요즘 피곤해"));
}

#[tokio::test]
async fn missing_text_is_400() {
    let stub = StubClient::new(Reply::Text("{}"));
    let (status, body) = send(app(stub.clone()), "POST", "/api/answer", r#"{"mode":"mybody"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing text"}));
    assert!(stub.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn other_methods_are_405() {
    let stub = StubClient::new(Reply::Text("{}"));
    let (status, body) = send(app(stub), "GET", "/api/answer", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn transport_failure_still_returns_an_answer() {
    let stub = StubClient::new(Reply::Fail);
    let (status, body) = send(
        app(stub),
        "POST",
        "/api/answer",
        r#"{"mode":"mybody","text":"sleep"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
    assert_eq!(body["answer"]["meta"]["missing"], json!(["all"]));
    assert_eq!(body["answer"]["evidenceType"], "user-input");
}

#[tokio::test]
async fn prose_completion_yields_canned_answer() {
    let stub = StubClient::new(Reply::Text("I am not able to answer in JSON."));
    let (status, body) = send(app(stub), "POST", "/api/answer", r#"{"text":"hi"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"]["meta"]["missing"], json!(["all"]));
    assert!(body["answer"]["nextQuestion"].as_str().unwrap().ends_with('?'));
}

#[tokio::test]
async fn health_is_ok() {
    let stub = StubClient::new(Reply::Text("{}"));
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app(stub).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}
