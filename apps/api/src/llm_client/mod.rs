/// Completion client: the single point of entry for all OpenAI API calls.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All completion requests MUST go through this module.
///
/// Model: gpt-4o-mini (hardcoded; do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub mod testing;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for every analysis run.
/// Intentionally hardcoded so feedback quality stays reproducible.
pub const MODEL: &str = "gpt-4o-mini";
/// Mild creativity: enough latitude to rewrite bullets without drifting.
const TEMPERATURE: f64 = 0.6;
const MAX_TOKENS: u32 = 900;

/// A failed completion is terminal for the current request. The caller
/// reports it to the user; nothing below this layer retries.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned an empty completion")]
    EmptyCompletion,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the assistant text from the first choice, rejecting blanks.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Pluggable seam between the analysis pipeline and the model provider.
/// Production wires in `OpenAiClient`; tests substitute a canned backend so
/// no network traffic leaves the process.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Runs one chat completion: a single attempt, no retry or backoff.
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, CompletionError>;
}

/// The production completion backend, wrapping the OpenAI Chat Completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, CompletionError> {
        let request_body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: api_error_detail(&body),
            });
        }

        let completion: ChatResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .into_text()
            .ok_or(CompletionError::EmptyCompletion)
    }
}

/// Pulls the human-readable message out of an OpenAI error envelope, falling
/// back to the raw body when it is not the expected JSON shape.
fn api_error_detail(body: &str) -> String {
    serde_json::from_str::<OpenAiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
