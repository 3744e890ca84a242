//! Model provider trait and implementations.

pub mod http;
pub mod openai_compatible;

#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "ollama")]
pub mod ollama;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::PlantCareConfig;
use crate::error::PlantCareError;
use crate::models::LanguageModel;
use crate::types::{GenerationSettings, TextStreamDelta, Usage};

/// A single-prompt request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub prompt: String,
    pub settings: GenerationSettings,
}

impl ProviderRequest {
    pub fn new(prompt: impl Into<String>, settings: GenerationSettings) -> Self {
        Self {
            prompt: prompt.into(),
            settings,
        }
    }
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "groq", "ollama").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate text (non-streaming).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, PlantCareError>;

    /// Generate text (streaming).
    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, PlantCareError>>, PlantCareError>;
}

/// Create a provider for the given model, using the provided config.
///
/// A missing hosted-API credential is reported here, before any request is made.
#[allow(unused_variables)]
pub fn create_provider(
    model: &LanguageModel,
    config: &PlantCareConfig,
) -> Result<Box<dyn ModelProvider>, PlantCareError> {
    match model {
        #[cfg(feature = "groq")]
        LanguageModel::Groq(m) => {
            let api_key = config.get_api_key("groq").ok_or_else(|| {
                PlantCareError::Authentication(
                    "No Groq API key found. Please set GROQ_API_KEY environment variable.".into(),
                )
            })?;
            Ok(Box::new(
                groq::GroqProvider::new(m.clone(), api_key, config.get_base_url("groq"))
                    .with_timeout(config.request_timeout("groq")),
            ))
        }
        #[cfg(feature = "ollama")]
        LanguageModel::Ollama(m) => Ok(Box::new(
            ollama::OllamaProvider::new(m.clone(), config.ollama_base_url())
                .with_timeout(config.request_timeout("ollama")),
        )),
        LanguageModel::Custom { provider, .. } => Err(PlantCareError::ModelNotFound(format!(
            "No built-in provider for '{provider}'. Use groq or ollama."
        ))),
    }
}
