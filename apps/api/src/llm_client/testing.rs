//! Canned completion backends for tests. Nothing here touches the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionBackend, CompletionError};

/// In-process backend with a fixed outcome. Records every call so tests can
/// assert on the exact prompt that crossed the model boundary.
pub struct MockBackend {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_system: Mutex<Option<String>>,
    last_prompt: Mutex<Option<String>>,
}

impl MockBackend {
    /// A backend that always answers with `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_system: Mutex::new(None),
            last_prompt: Mutex::new(None),
        }
    }

    /// A backend whose every call fails with an API error carrying `detail`.
    pub fn failing(detail: &str) -> Self {
        Self {
            reply: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
            last_system: Mutex::new(None),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_system.lock().unwrap() = Some(system.to_string());

        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(detail) => Err(CompletionError::Api {
                status: 429,
                message: detail.clone(),
            }),
        }
    }
}
