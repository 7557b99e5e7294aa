//! HTTP transport for the answer service
//!
//! One POST endpoint turns a question into a normalized answer; `/health` is
//! plain text. Transport failures still return a schema-complete answer.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::answer::Answer;
use crate::clients::CompletionClient;
use crate::config::{Config, ServerConfig};
use crate::error::{AnswerError, Result};
use crate::pipeline::{FallbackContext, Normalizer};
use crate::prompt;
use crate::request::AnswerRequest;

/// Shared state for HTTP server
#[derive(Clone)]
pub struct AppState {
    pub normalizer: Arc<Normalizer>,
    pub client: Arc<dyn CompletionClient>,
    pub server: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: &Config, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            normalizer: Arc::new(Normalizer::new(config.pipeline.clone())),
            client,
            server: Arc::new(config.server.clone()),
        }
    }
}

#[derive(Serialize)]
struct AnswerBody {
    answer: Answer,
}

#[derive(Serialize)]
struct TransportFailureBody {
    error: String,
    answer: Answer,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

/// Ask the generative service and normalize whatever comes back.
pub async fn answer_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let req = match AnswerRequest::from_body(&body, state.server.turn_window) {
        Ok(req) => req,
        Err(err) => {
            tracing::debug!(%request_id, error = %err, "rejected request");
            return err.into_response();
        }
    };

    tracing::info!(
        %request_id,
        mode = req.mode.as_str(),
        turns = req.context.len(),
        "answer requested"
    );

    let locale = state.normalizer.config().language;
    let messages = prompt::build_messages(&req, locale, state.server.context_char_limit);
    let ctx = FallbackContext::new(req.mode);

    match state.client.complete(&messages).await {
        Ok(raw) => {
            let answer = state.normalizer.normalize_with(&raw, &ctx);
            tracing::info!(
                %request_id,
                missing = answer.meta.missing.len(),
                references = answer.references.len(),
                "answer normalized"
            );
            (StatusCode::OK, Json(AnswerBody { answer })).into_response()
        }
        Err(err) => {
            let err = AnswerError::from(err);
            tracing::warn!(%request_id, error = %err, "completion failed, returning canned answer");
            (
                err.status_code(),
                Json(TransportFailureBody {
                    error: err.public_message(),
                    answer: state.normalizer.transport_fallback(&ctx),
                }),
            )
                .into_response()
        }
    }
}

/// Build the router; any method other than POST on the answer path is a 405.
pub fn router(state: AppState) -> Router {
    let path = state.server.path.clone();
    Router::new()
        .route("/health", get(health_handler))
        .route(&path, post(answer_handler).fallback(method_not_allowed))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(config: &Config, client: Arc<dyn CompletionClient>) -> Result<()> {
    let app = router(AppState::new(config, client));

    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", config.server.bind, e))?;

    tracing::info!(
        "Starting HTTP server on {} (answers at {})",
        config.server.bind,
        config.server.path
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
