//! Axum route handlers for the analysis API.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::critique::run_critique;
use crate::errors::AppError;
use crate::extract::{MediaType, UploadedDocument};
use crate::llm_client::MODEL;
use crate::state::AppState;

/// Multipart field carrying the resume file.
const RESUME_FIELD: &str = "resume";
/// Multipart field carrying the optional target role.
const ROLE_FIELD: &str = "target_role";
/// Multipart field carrying the optional job description.
const JD_FIELD: &str = "job_description";

/// Filename offered when feedback is downloaded.
const EXPORT_FILENAME: &str = "resume_feedback.md";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Markdown feedback, returned exactly as the model produced it.
    pub feedback: String,
    /// Model that produced the feedback.
    pub model: String,
    /// Role the feedback was framed for, after default substitution.
    pub target_role: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub feedback: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF or TXT file, required), `target_role`
/// (optional text), `job_description` (optional text). Runs one completion
/// and returns the Markdown feedback.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut document: Option<UploadedDocument> = None;
    let mut target_role: Option<String> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            RESUME_FIELD => {
                let media_type = MediaType::infer(field.content_type(), field.file_name());
                let content = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read resume upload: {e}"))
                })?;
                document = Some(UploadedDocument {
                    content,
                    media_type,
                });
            }
            ROLE_FIELD => {
                target_role = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read target_role: {e}"))
                })?);
            }
            JD_FIELD => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_description: {e}"))
                })?);
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let document = document.ok_or_else(|| {
        AppError::Validation("Upload a PDF or TXT resume before analyzing.".to_string())
    })?;

    if state.config.openai_api_key.is_empty() {
        return Err(AppError::MissingApiKey);
    }

    let critique = run_critique(
        state.model.as_ref(),
        &document,
        target_role.as_deref(),
        job_description.as_deref(),
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        feedback: critique.feedback,
        model: MODEL.to_string(),
        target_role: critique.target_role,
    }))
}

/// POST /api/v1/analyze/export
///
/// Echoes previously returned feedback back as a Markdown attachment, so a
/// client can offer it as a file download without reshaping anything.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/markdown".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        request.feedback,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::MockBackend;
    use crate::routes::build_router;

    const BOUNDARY: &str = "critiq-test-boundary";
    const RESUME_TEXT: &str = "John Doe, Software Engineer, 3 years Python";

    fn config_with_key(key: &str) -> Config {
        Config {
            openai_api_key: key.to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(backend: Arc<MockBackend>) -> axum::Router {
        build_router(AppState {
            config: config_with_key("sk-test"),
            model: backend,
        })
    }

    struct MultipartBuilder {
        body: Vec<u8>,
    }

    impl MultipartBuilder {
        fn new() -> Self {
            Self { body: Vec::new() }
        }

        fn text_field(mut self, name: &str, value: &str) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
            self
        }

        fn file_field(
            mut self,
            name: &str,
            filename: &str,
            content_type: &str,
            content: &[u8],
        ) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                     filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            self.body.extend_from_slice(content);
            self.body.extend_from_slice(b"\r\n");
            self
        }

        fn finish(mut self) -> Vec<u8> {
            self.body
                .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
            self.body
        }
    }

    fn analyze_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_text_resume_end_to_end() {
        let backend = Arc::new(MockBackend::replying("### Summary\nStrong Python background."));
        let app = app(backend.clone());

        let body = MultipartBuilder::new()
            .file_field(RESUME_FIELD, "resume.txt", "text/plain", RESUME_TEXT.as_bytes())
            .text_field(ROLE_FIELD, "Backend Engineer")
            .finish();

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["feedback"], "### Summary\nStrong Python background.");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["target_role"], "Backend Engineer");

        assert_eq!(backend.call_count(), 1);
        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("**Backend Engineer**"));
        assert!(prompt.contains(RESUME_TEXT));
        assert!(!prompt.contains("Job Description:"));
    }

    #[tokio::test]
    async fn test_analyze_forwards_job_description() {
        let backend = Arc::new(MockBackend::replying("fine"));
        let app = app(backend.clone());

        let body = MultipartBuilder::new()
            .file_field(RESUME_FIELD, "resume.txt", "text/plain", RESUME_TEXT.as_bytes())
            .text_field(JD_FIELD, "Requires 5 years of Python.")
            .finish();

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["target_role"], "general applications");

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("\nJob Description:\nRequires 5 years of Python."));
    }

    #[tokio::test]
    async fn test_analyze_without_file_is_rejected_before_any_call() {
        let backend = Arc::new(MockBackend::replying("unused"));
        let app = app(backend.clone());

        let body = MultipartBuilder::new()
            .text_field(ROLE_FIELD, "Backend Engineer")
            .finish();

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_without_api_key_reports_actionable_config_error() {
        let backend = Arc::new(MockBackend::replying("unused"));
        let app = build_router(AppState {
            config: config_with_key(""),
            model: backend.clone(),
        });

        let body = MultipartBuilder::new()
            .file_field(RESUME_FIELD, "resume.txt", "text/plain", RESUME_TEXT.as_bytes())
            .finish();

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "MISSING_API_KEY");
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(message.contains(".env"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_unreadable_document_maps_to_unprocessable() {
        let backend = Arc::new(MockBackend::replying("unused"));
        let app = app(backend.clone());

        let body = MultipartBuilder::new()
            .file_field(RESUME_FIELD, "scan.pdf", "application/pdf", b"not a real pdf")
            .finish();

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "EMPTY_EXTRACTION");
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.contains("scanned"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_surfaces_completion_failure_detail() {
        let backend = Arc::new(MockBackend::failing("rate limit exceeded"));
        let app = app(backend.clone());

        let body = MultipartBuilder::new()
            .file_field(RESUME_FIELD, "resume.txt", "text/plain", RESUME_TEXT.as_bytes())
            .finish();

        let response = app.oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "COMPLETION_ERROR");
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Analysis failed: "), "got: {message}");
        assert!(message.contains("rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_export_wraps_feedback_as_markdown_attachment() {
        let backend = Arc::new(MockBackend::replying("unused"));
        let app = app(backend);

        let feedback = "### Summary\nGood resume.";
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze/export")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "feedback": feedback }).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert_eq!(content_type, "text/markdown");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert_eq!(disposition, "attachment; filename=\"resume_feedback.md\"");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], feedback.as_bytes());
    }
}
