//! Groq provider (OpenAI-compatible).

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::PlantCareError;
use crate::models::groq::GroqModel;
use crate::types::TextStreamDelta;

use super::openai_compatible::OpenAiCompatibleProvider;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqProvider {
    inner: OpenAiCompatibleProvider,
}

impl GroqProvider {
    pub fn new(model: GroqModel, api_key: String, base_url: Option<String>) -> Self {
        Self {
            inner: OpenAiCompatibleProvider::new(
                model.as_str().to_string(),
                api_key,
                base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ),
        }
    }

    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        Self {
            inner: self.inner.with_timeout(timeout),
        }
    }
}

#[async_trait]
impl ModelProvider for GroqProvider {
    fn provider_name(&self) -> &str {
        "groq"
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, PlantCareError> {
        self.inner.generate_text(request).await
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, PlantCareError>>, PlantCareError> {
        self.inner.stream_text(request).await
    }
}
