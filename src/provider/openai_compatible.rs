//! Chat Completions client for OpenAI-compatible hosted APIs.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::error::PlantCareError;
use crate::types::{TextStreamDelta, Usage};

use super::http::{
    bearer_headers, drain_lines, parse_sse_data, shared_client, status_to_error, with_timeout,
};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Provider for any API exposing `POST {base_url}/chat/completions`.
pub struct OpenAiCompatibleProvider {
    model_id: String,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenAiCompatibleProvider {
    pub fn new(model_id: String, api_key: String, base_url: String) -> Self {
        Self {
            model_id,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request_body(&self, request: &ProviderRequest, stream: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model_id,
            "messages": [{ "role": "user", "content": request.prompt }],
            "stream": stream,
        });

        if let Some(obj) = body.as_object_mut() {
            let settings = &request.settings;
            if let Some(max) = settings.max_tokens {
                obj.insert("max_completion_tokens".into(), max.into());
            }
            if let Some(temp) = settings.temperature {
                obj.insert("temperature".into(), temp.into());
            }
            if let Some(top_p) = settings.top_p {
                obj.insert("top_p".into(), top_p.into());
            }
        }

        body
    }

    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response, PlantCareError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(body);
        let resp = with_timeout(request, self.timeout).send().await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    fn provider_name(&self) -> &str {
        "openai-compatible"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, PlantCareError> {
        let body = self.build_request_body(request, false);
        debug!(model = %self.model_id, "chat completion generate_text");

        let data: ChatResponse = self.post(&body).await?.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PlantCareError::api(200, "No choices in chat completion response"))?;

        Ok(ProviderResponse {
            text: choice.message.content.unwrap_or_default(),
            usage: data.usage.map(Usage::from).unwrap_or_default(),
        })
    }

    async fn stream_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, PlantCareError>>, PlantCareError> {
        let body = self.build_request_body(request, true);
        debug!(model = %self.model_id, "chat completion stream_text");

        let byte_stream = self.post(&body).await?.bytes_stream();

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
                    if line == "data: [DONE]" {
                        break 'read;
                    }
                    let Some(data) = parse_sse_data(&line) else {
                        continue;
                    };
                    match serde_json::from_str::<ChatStreamChunk>(data) {
                        Ok(chunk) => {
                            let usage = chunk.usage.map(Usage::from);
                            if let Some(choice) = chunk.choices.into_iter().next() {
                                let text = choice.delta.content.unwrap_or_default();
                                if !text.is_empty() {
                                    yield Ok(TextStreamDelta::text(text));
                                }
                                if choice.finish_reason.is_some() {
                                    yield Ok(TextStreamDelta::done(usage));
                                    finished = true;
                                    break 'read;
                                }
                            }
                        }
                        Err(e) => debug!(error = %e, "skipping unparseable SSE chunk"),
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

// Chat Completions response types (internal)

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<ChatUsage> for Usage {
    fn from(u: ChatUsage) -> Self {
        Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

#[derive(Deserialize)]
struct ChatStreamChunk {
    choices: Vec<ChatStreamChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatStreamChoice {
    delta: ChatStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatStreamDelta {
    content: Option<String>,
}
