use crate::models::DEFAULT_OPENAI_BASE_URL;
use crate::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Thin authenticated JSON transport for the OpenAI REST API.
///
/// No timeout is configured here; requests use the `reqwest::Client` defaults.
pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn get<Resp: DeserializeOwned>(&self, path: &str) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        self.send(self.client.get(&url)).await
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        self.send(self.client.post(&url).json(request)).await
    }

    async fn send<Resp: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Resp> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("OpenAI API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "OpenAI API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse OpenAI response: {}", e))
        })
    }
}
