use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the current action; nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The service credential is absent. Reported before any extraction or
    /// outbound call is attempted.
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,

    /// The uploaded document yielded no usable text.
    #[error("no text could be extracted from the uploaded document")]
    EmptyExtraction,

    /// The generative call failed. The detail is shown to the user as-is;
    /// there is no degraded-mode or partial output to fall back on.
    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingApiKey => (
                StatusCode::SERVICE_UNAVAILABLE,
                "MISSING_API_KEY",
                "OPENAI_API_KEY is missing. Set it in the environment or in a .env file \
                 (example: OPENAI_API_KEY=sk-your-key-here) and restart the service."
                    .to_string(),
            ),
            AppError::EmptyExtraction => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_EXTRACTION",
                "Could not extract text from the uploaded document. If the PDF is scanned, \
                 export a text-based PDF and try again."
                    .to_string(),
            ),
            AppError::Completion(detail) => {
                tracing::error!("Completion error: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "COMPLETION_ERROR",
                    format!("Analysis failed: {detail}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
