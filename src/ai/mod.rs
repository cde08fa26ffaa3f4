//! AI service integration for summarization and battle map rendering
//!
//! Provides the [`AiService`] interface over OpenAI's Models, Chat Completions
//! and Image APIs, plus an in-process mock for tests.

pub mod mock;
pub mod openai;

pub use mock::MockAiClient;
pub use openai::OpenAiClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AiService: Send + Sync {
    /// Cheap read-only call used to check that the credential works.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Condense a free-text battle map description.
    async fn summarize(&self, prompt: &str) -> Result<String>;

    /// Render a battle map from a summary and return the image URL.
    async fn generate_image(&self, summary: &str) -> Result<String>;
}
