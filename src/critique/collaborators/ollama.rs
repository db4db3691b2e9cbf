// Ollama generation client - non-streaming /api/chat with optional image

use super::Generator;
use crate::critique::config::CritiqueConfig;
use crate::critique::error::CollaboratorError;
use crate::critique::types::ImageRef;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Generation collaborator backed by a local Ollama server
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    options: ModelOptions,
}

impl OllamaGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        top_p: f32,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            options: ModelOptions { temperature, top_p },
        })
    }

    /// Generator for analysis, perspective and synthesis prompts
    pub fn text(config: &CritiqueConfig) -> Result<Self, CollaboratorError> {
        Self::new(
            &config.ollama_endpoint,
            &config.text_model,
            config.text_temperature,
            config.top_p,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Generator for image description
    pub fn vision(config: &CritiqueConfig) -> Result<Self, CollaboratorError> {
        Self::new(
            &config.ollama_endpoint,
            &config.vision_model,
            config.vision_temperature,
            config.top_p,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Base64 payload for the `images` field
    async fn encode_image(&self, image: &ImageRef) -> Result<String, CollaboratorError> {
        match image {
            ImageRef::DataUri(uri) => strip_data_uri(uri),
            ImageRef::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    CollaboratorError::Image(format!("{}: {}", path.display(), e))
                })?;
                Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            ImageRef::Url(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(CollaboratorError::Image(format!("Unsupported image URL: {}", url)));
                }
                let response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(CollaboratorError::Image(format!(
                        "Image download failed: {}",
                        response.status()
                    )));
                }
                let bytes = response.bytes().await?;
                Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        }
    }
}

/// Payload of a `data:image/...;base64,` URI
fn strip_data_uri(uri: &str) -> Result<String, CollaboratorError> {
    uri.split_once(',')
        .map(|(_, data)| data.to_string())
        .filter(|data| !data.is_empty())
        .ok_or_else(|| CollaboratorError::Image("Malformed data URI".to_string()))
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageRef>,
    ) -> Result<String, CollaboratorError> {
        let images = match image {
            Some(image) => Some(vec![self.encode_image(image).await?]),
            None => None,
        };

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
                images,
            }],
            stream: false,
            options: self.options.clone(),
        };

        debug!(model = %self.model, with_image = image.is_some(), "ollama chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.endpoint))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CollaboratorError::Generation(format!(
                "LLM request failed: {}",
                response.status()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Parse(e.to_string()))?;

        Ok(chat_response.message.content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: ModelOptions,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
struct ModelOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
