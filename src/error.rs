// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Message shown to the user whenever quiz generation fails, whatever the cause.
pub const GENERATION_FAILED_MESSAGE: &str = "could not generate quiz";

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., generation already running for the session)
    Conflict(String),

    // 502 Bad Gateway. Carries the diagnostic reason, which is logged but not returned.
    GenerationFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::GenerationFailed(reason) => {
                tracing::error!("Quiz generation failed: {}", reason);
                (
                    StatusCode::BAD_GATEWAY,
                    GENERATION_FAILED_MESSAGE.to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::GenerationFailed(err.to_string())
    }
}

/// Startup configuration problems. Always fatal.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything that can go wrong while producing a quiz.
///
/// Callers treat all variants alike; the variant only matters for logs and tests.
#[derive(Debug)]
pub enum GenerationError {
    /// The request never completed (connection, timeout, body read).
    Transport(String),
    /// The service answered with a non-success status.
    HttpStatus(u16),
    /// The service answered but returned no text.
    EmptyResponse,
    /// The returned text is not valid JSON.
    InvalidJson(String),
    /// The JSON has no `"quiz"` key.
    MissingQuiz,
    /// `"quiz"` is present but not an array of question objects.
    MalformedQuiz(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Transport(msg) => write!(f, "request failed: {}", msg),
            GenerationError::HttpStatus(code) => write!(f, "service returned status {}", code),
            GenerationError::EmptyResponse => write!(f, "service returned no content"),
            GenerationError::InvalidJson(msg) => write!(f, "response is not valid JSON: {}", msg),
            GenerationError::MissingQuiz => write!(f, "response has no \"quiz\" key"),
            GenerationError::MalformedQuiz(msg) => write!(f, "\"quiz\" is malformed: {}", msg),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::InvalidJson(err.to_string())
    }
}
