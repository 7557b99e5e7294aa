//! Domain-specific error types for answer-normalizer
//!
//! The normalization pipeline itself is total and never produces these; they
//! belong to the collaborators around it (request parsing, transport, server start-up).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::clients::CompletionError;

/// Main error type for the answer service
#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AnswerError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AnswerError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AnswerError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AnswerError::Completion(_) => StatusCode::BAD_GATEWAY,
            AnswerError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client; internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AnswerError::InvalidRequest { message } => message.clone(),
            AnswerError::Completion(err) => err.to_string(),
            AnswerError::Internal { .. } => "Server error".to_string(),
        }
    }
}

impl From<anyhow::Error> for AnswerError {
    fn from(err: anyhow::Error) -> Self {
        AnswerError::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert AnswerError to an HTTP response
impl IntoResponse for AnswerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for answer-normalizer operations
pub type Result<T> = std::result::Result<T, AnswerError>;
