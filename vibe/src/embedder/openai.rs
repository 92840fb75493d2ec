//! OpenAI Embeddings implementation of [`Embedder`].
//!
//! Works with any OpenAI-compatible `/embeddings` endpoint (set the base URL through
//! [`OpenAIConfig::with_api_base`]). The API key is read from `OPENAI_API_KEY` unless a
//! custom config is supplied.

use async_openai::{
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use tracing::debug;

use super::{EmbedError, Embedder};

/// Default model; 1536 dimensions.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// OpenAI embeddings client.
///
/// All anchor labels are sent in one batched request, so the anchor computation costs a
/// single round trip.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Creates an embedder for `model` using the default config (`OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Creates an embedder with a custom API key and/or base URL.
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimensions = model_dimensions(&model);
        Self {
            client: Client::with_config(config),
            model,
            dimensions,
        }
    }

    /// Creates an embedder from plain settings. `None` keeps the `async-openai` defaults
    /// (`OPENAI_API_KEY`, `https://api.openai.com/v1`).
    pub fn with_endpoint(
        api_key: Option<&str>,
        api_base: Option<&str>,
        model: impl Into<String>,
    ) -> Self {
        let mut config = OpenAIConfig::new();
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self::with_config(config, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Known output dimensions; unknown models are assumed to match `text-embedding-3-small`.
fn model_dimensions(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        _ => 1536,
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let input = match texts {
            [single] => EmbeddingInput::String(single.to_string()),
            _ => EmbeddingInput::StringArray(texts.iter().map(|s| s.to_string()).collect()),
        };
        let request = CreateEmbeddingRequest {
            input,
            model: self.model.clone(),
            ..Default::default()
        };

        debug!(model = %self.model, count = texts.len(), "requesting embeddings");
        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        let mut data = response.data;
        if data.is_empty() {
            return Err(EmbedError::EmptyResponse);
        }
        if data.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                expected: texts.len(),
                actual: data.len(),
            });
        }
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimensions
    }
}
