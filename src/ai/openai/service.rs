use super::client::OpenAiHttpClient;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ImageGenerationRequest,
    ImageGenerationResponse, ModelListResponse,
};
use crate::ai::AiService;
use crate::models::{Credential, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL};
use crate::{prompts, Error, Result};
use async_trait::async_trait;

pub const IMAGE_SIZE: &str = "1024x1024";
pub const IMAGE_QUALITY: &str = "standard";

/// OpenAI implementation of [`AiService`], bound to one API key.
pub struct OpenAiClient {
    http: OpenAiHttpClient,
    chat_model: String,
    image_model: String,
}

impl OpenAiClient {
    pub fn new(credential: &Credential) -> Self {
        Self::new_with_client(credential, reqwest::Client::new())
    }

    pub fn new_with_client(credential: &Credential, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(credential.expose().to_string(), client),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_models(mut self, chat_model: String, image_model: String) -> Self {
        self.chat_model = chat_model;
        self.image_model = image_model;
        self
    }
}

#[async_trait]
impl AiService for OpenAiClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        tracing::debug!("Listing OpenAI models");

        let response: ModelListResponse = self.http.get("/v1/models").await?;
        Ok(response.data.into_iter().map(|model| model.id).collect())
    }

    async fn summarize(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Summarizing battle map description with {}", self.chat_model);

        let request = ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage::system(prompts::SUMMARY_SYSTEM),
                ChatMessage::user(prompts::render(
                    prompts::SUMMARY_USER,
                    &[("prompt", prompt)],
                )),
            ],
        };

        let response: ChatCompletionResponse =
            self.http.post("/v1/chat/completions", &request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Summary was truncated by the token limit");
        }

        if let Some(refusal) = choice.message.refusal {
            return Err(Error::AiProvider(format!(
                "Summary request refused: {}",
                refusal
            )));
        }

        choice
            .message
            .content
            .ok_or_else(|| Error::AiProvider("Empty message from OpenAI chat API".to_string()))
    }

    async fn generate_image(&self, summary: &str) -> Result<String> {
        tracing::debug!("Generating battle map image with {}", self.image_model);

        let request = ImageGenerationRequest {
            model: self.image_model.clone(),
            prompt: prompts::render(prompts::BATTLEMAP_IMAGE, &[("summary", summary)]),
            n: 1,
            size: IMAGE_SIZE.to_string(),
            quality: IMAGE_QUALITY.to_string(),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No image data in OpenAI response".to_string()))?;

        if let Some(revised) = &image.revised_prompt {
            tracing::debug!("Image model revised prompt: {}", revised);
        }

        image
            .url
            .ok_or_else(|| Error::AiProvider("No image URL in OpenAI response".to_string()))
    }
}
