use super::AiService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    probe_error: Option<String>,
    summary_responses: Vec<std::result::Result<String, String>>,
    image_responses: Vec<std::result::Result<String, String>>,
    probe_calls: usize,
    summary_calls: usize,
    image_calls: usize,
    summarized_prompts: Vec<String>,
    image_summaries: Vec<String>,
}

/// Scriptable [`AiService`]. Clones share state, so a test can keep a probe
/// handle after moving the client into the code under test.
#[derive(Clone, Default)]
pub struct MockAiClient {
    state: Arc<Mutex<MockState>>,
}

impl MockAiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe_error(self, message: &str) -> Self {
        self.state.lock().unwrap().probe_error = Some(message.to_string());
        self
    }

    pub fn with_summary_response(self, response: String) -> Self {
        self.state.lock().unwrap().summary_responses.push(Ok(response));
        self
    }

    pub fn with_summary_error(self, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .summary_responses
            .push(Err(message.to_string()));
        self
    }

    pub fn with_image_response(self, url: String) -> Self {
        self.state.lock().unwrap().image_responses.push(Ok(url));
        self
    }

    pub fn with_image_error(self, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .image_responses
            .push(Err(message.to_string()));
        self
    }

    pub fn get_probe_count(&self) -> usize {
        self.state.lock().unwrap().probe_calls
    }

    pub fn get_summary_count(&self) -> usize {
        self.state.lock().unwrap().summary_calls
    }

    pub fn get_image_count(&self) -> usize {
        self.state.lock().unwrap().image_calls
    }

    /// Total remote calls of any kind.
    pub fn get_call_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.probe_calls + state.summary_calls + state.image_calls
    }

    pub fn summarized_prompts(&self) -> Vec<String> {
        self.state.lock().unwrap().summarized_prompts.clone()
    }

    /// Summaries passed to `generate_image`, in call order.
    pub fn image_summaries(&self) -> Vec<String> {
        self.state.lock().unwrap().image_summaries.clone()
    }
}

fn pick(responses: &[std::result::Result<String, String>], call: usize) -> Option<Result<String>> {
    if responses.is_empty() {
        return None;
    }
    let index = (call - 1) % responses.len();
    Some(responses[index].clone().map_err(Error::AiProvider))
}

#[async_trait]
impl AiService for MockAiClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.probe_calls += 1;

        match &state.probe_error {
            Some(message) => Err(Error::AiProvider(message.clone())),
            None => Ok(vec!["gpt-4".to_string(), "dall-e-3".to_string()]),
        }
    }

    async fn summarize(&self, prompt: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.summary_calls += 1;
        state.summarized_prompts.push(prompt.to_string());

        // Default mock response
        pick(&state.summary_responses, state.summary_calls)
            .unwrap_or_else(|| Ok("A mock battle map summary".to_string()))
    }

    async fn generate_image(&self, summary: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.image_calls += 1;
        state.image_summaries.push(summary.to_string());

        let call = state.image_calls;
        pick(&state.image_responses, call).unwrap_or_else(|| {
            Ok(format!(
                "https://mock-images.example.com/battlemap-{}.png",
                call
            ))
        })
    }
}
