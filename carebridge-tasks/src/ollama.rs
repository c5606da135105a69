//! Ollama-backed generator.
//!
//! Generation goes through a rig agent built per call; the liveness probe lists the
//! locally pulled models over Ollama's REST API. Both share one HTTP client.

use async_trait::async_trait;
use rig::{
    client::CompletionClient,
    completion::{CompletionError, Prompt, PromptError},
    providers::ollama,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::GenerationError;
use crate::generator::{SamplingOptions, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

// rig reports a failed send as a provider error carrying reqwest's message.
const SEND_FAILURE_PREFIX: &str = "error sending request";

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

pub struct OllamaGenerator {
    client: ollama::Client,
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Fails when `base_url` is not an absolute URL.
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, GenerationError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http_client = reqwest::Client::new();
        let client = ollama::Client::builder()
            .base_url(&base_url)
            .custom_client(http_client.clone())
            .build()
            .map_err(|e| GenerationError::InvalidEndpoint(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            http_client,
            base_url,
            model: model.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<String, GenerationError> {
        let mut builder = self
            .client
            .agent(&self.model)
            .temperature(options.temperature);
        if let Some(params) = options.extra_params() {
            builder = builder.additional_params(params);
        }
        let agent = builder.build();

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            temperature = options.temperature,
            "Sending prompt to Ollama"
        );

        agent.prompt(prompt).await.map_err(classify_prompt_error)
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Transport failures mean Ollama could not be reached; anything else came back from it.
fn classify_prompt_error(error: PromptError) -> GenerationError {
    match error {
        PromptError::CompletionError(CompletionError::HttpError(e)) => {
            GenerationError::Unavailable(e.to_string())
        }
        PromptError::CompletionError(CompletionError::ProviderError(message))
            if message.starts_with(SEND_FAILURE_PREFIX) =>
        {
            GenerationError::Unavailable(message)
        }
        other => GenerationError::Upstream(other.to_string()),
    }
}
