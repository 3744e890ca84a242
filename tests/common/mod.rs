//! Shared test helpers and mock provider.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::BoxStream;

use plant_care::availability::ModelCatalog;
use plant_care::error::PlantCareError;
use plant_care::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use plant_care::types::{TextStreamDelta, Usage};

/// A mock provider that answers by matching the prompt against queued rules.
pub struct MockProvider {
    model_id: String,
    rules: Mutex<Vec<(String, Result<String, u16>)>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            rules: Mutex::new(Vec::new()),
            fallback: "Mock response".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer `text` to any prompt containing `needle`.
    pub fn respond_when(self, needle: &str, text: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Ok(text.to_string())));
        self
    }

    /// Fail with an API error of `status` for any prompt containing `needle`.
    pub fn fail_when(self, needle: &str, status: u16) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Err(status)));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn answer(&self, prompt: &str) -> Result<String, PlantCareError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let rules = self.rules.lock().unwrap();
        match rules.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
            Some((_, Ok(text))) => Ok(text.clone()),
            Some((_, Err(status))) => Err(PlantCareError::api(*status, "mock failure")),
            None => Ok(self.fallback.clone()),
        }
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, PlantCareError> {
        let text = self.answer(&request.prompt)?;
        Ok(ProviderResponse {
            text,
            usage: Usage::new(10, 20),
        })
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, PlantCareError>>, PlantCareError> {
        let text = self.answer(&request.prompt)?;

        let stream = async_stream::stream! {
            for chunk in text.chars().collect::<Vec<_>>().chunks(5) {
                let text: String = chunk.iter().collect();
                yield Ok(TextStreamDelta::text(text));
            }
            yield Ok(TextStreamDelta::done(Some(Usage::new(10, 20))));
        };

        Ok(Box::pin(stream))
    }
}

/// Catalog listing a fixed set of models.
pub struct StaticCatalog(pub Vec<String>);

#[async_trait]
impl ModelCatalog for StaticCatalog {
    async fn list_models(&self) -> Result<Vec<String>, PlantCareError> {
        Ok(self.0.clone())
    }
}

pub const ALOE_BODY: &str =
    "## Watering\nWater deeply every 2-3 weeks.\n\n## Light\nBright, indirect sunlight.";
