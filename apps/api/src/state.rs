use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; handlers never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable completion backend. Production: `OpenAiClient`. Tests swap in
    /// a mock to observe or suppress outbound calls.
    pub model: Arc<dyn CompletionBackend>,
}
