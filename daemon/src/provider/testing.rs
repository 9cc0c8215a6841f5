//! Scripted provider for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{DaemonError, ErrorCode, Result};

use super::{ConceptProvider, ImageRequest, TextRequest};

/// A well-formed concept response.
pub const CONCEPT_JSON: &str = r#"{"title":"Neon Rain","artist":"Kaito Wave","style":"Synthwave","lyrics":"City lights\nfalling down\non a neon\nrainy town"}"#;

/// Provider returning canned outcomes and recording every prompt.
pub struct ScriptedProvider {
    text: std::result::Result<String, ErrorCode>,
    image: std::result::Result<String, ErrorCode>,
    text_delays: Mutex<VecDeque<Duration>>,
    image_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(
        text: std::result::Result<&str, ErrorCode>,
        image: std::result::Result<&str, ErrorCode>,
    ) -> Self {
        Self {
            text: text.map(str::to_string),
            image: image.map(str::to_string),
            text_delays: Mutex::new(VecDeque::new()),
            image_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Provider where both steps succeed.
    pub fn succeeding() -> Self {
        Self::new(Ok(CONCEPT_JSON), Ok("/9j/4AAQ"))
    }

    /// Delays successive text calls by the given durations.
    pub fn with_text_delays(self, delays: &[Duration]) -> Self {
        *self.text_delays.lock().unwrap() = delays.iter().copied().collect();
        self
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ConceptProvider for ScriptedProvider {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let delay = self.text_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.text
            .clone()
            .map_err(|code| DaemonError::new(code, "scripted failure"))
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<String> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.image
            .clone()
            .map_err(|code| DaemonError::new(code, "scripted failure"))
    }
}
