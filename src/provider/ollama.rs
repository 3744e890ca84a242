//! Ollama local provider (native `/api/generate` and `/api/tags` endpoints).

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::ModelCatalog;
use crate::error::PlantCareError;
use crate::models::ollama::OllamaModel;
use crate::types::{GenerationSettings, TextStreamDelta, Usage};

use super::http::{drain_lines, shared_client, status_to_error, with_timeout};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

pub struct OllamaProvider {
    model: OllamaModel,
    base_url: String,
    timeout: Option<Duration>,
}

impl OllamaProvider {
    pub fn new(model: OllamaModel, base_url: String) -> Self {
        Self {
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Bound each request; `None` waits as long as the server takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &OllamaModel {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request_body<'a>(
        &'a self,
        request: &'a ProviderRequest,
        stream: bool,
    ) -> GenerateRequest<'a> {
        GenerateRequest {
            model: self.model.as_str(),
            prompt: &request.prompt,
            stream,
            options: GenerateOptions::from_settings(&request.settings),
        }
    }

    async fn post_generate(
        &self,
        body: &GenerateRequest<'_>,
    ) -> Result<reqwest::Response, PlantCareError> {
        let url = format!("{}/api/generate", self.base_url);
        let resp = with_timeout(shared_client().post(&url).json(body), self.timeout)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, PlantCareError> {
        let body = self.build_request_body(request, false);
        debug!(model = self.model.as_str(), "Ollama generate_text");

        let data: GenerateResponse = self.post_generate(&body).await?.json().await?;
        let usage = data.usage();
        Ok(ProviderResponse {
            text: data.response,
            usage,
        })
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, PlantCareError>>, PlantCareError> {
        let body = self.build_request_body(request, true);
        debug!(model = self.model.as_str(), "Ollama stream_text");

        let byte_stream = self.post_generate(&body).await?.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            let mut finished = false;
            futures::pin_mut!(byte_stream);

            'read: while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(PlantCareError::Network(e));
                        finished = true;
                        break;
                    }
                };

                buffer.extend_from_slice(&chunk);

                for line in drain_lines(&mut buffer) {
                    match serde_json::from_str::<GenerateResponse>(&line) {
                        Ok(part) => {
                            if !part.response.is_empty() {
                                yield Ok(TextStreamDelta::text(part.response.clone()));
                            }
                            if part.done {
                                yield Ok(TextStreamDelta::done(Some(part.usage())));
                                finished = true;
                                break 'read;
                            }
                        }
                        Err(e) => {
                            let message = format!("bad Ollama stream line: {e}");
                            yield Err(PlantCareError::Stream(message));
                            finished = true;
                            break 'read;
                        }
                    }
                }
            }

            if !finished {
                yield Ok(TextStreamDelta::done(None));
            }
        };

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl ModelCatalog for OllamaProvider {
    async fn list_models(&self) -> Result<Vec<String>, PlantCareError> {
        let url = format!("{}/api/tags", self.base_url);
        debug!(%url, "Ollama list_models");

        let resp = with_timeout(shared_client().get(&url), self.timeout)
            .send()
            .await?;
        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let tags: TagsResponse = resp.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

// Ollama API wire types (internal)

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl GenerateOptions {
    fn from_settings(settings: &GenerationSettings) -> Option<Self> {
        if settings.is_empty() {
            return None;
        }
        Some(Self {
            temperature: settings.temperature,
            top_p: settings.top_p,
            num_predict: settings.max_tokens,
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

impl GenerateResponse {
    fn usage(&self) -> Usage {
        Usage::new(
            self.prompt_eval_count.unwrap_or(0),
            self.eval_count.unwrap_or(0),
        )
    }
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}
