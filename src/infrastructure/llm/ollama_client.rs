use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};

use super::http_body::{STREAM_TRUNCATED, body_lines, ensure_success};

/// Client for Ollama's native `/api/generate` endpoint.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: usize,
    temperature: f32,
    timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: String,
        max_tokens: usize,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, LlmClientError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| LlmClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
            max_tokens,
            temperature,
            timeout,
        })
    }

    fn request(&self, prompt: &str, stream: bool) -> reqwest::RequestBuilder {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let request = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body);

        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    #[tracing::instrument(
        skip(self, prompt),
        fields(model = %self.model, prompt_chars = prompt.len())
    )]
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let response = self
            .request(prompt, false)
            .timeout(self.timeout)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmClientError::Timeout
            } else {
                LlmClientError::InvalidResponse(e.to_string())
            }
        })?;

        if let Some(error) = generated.error {
            return Err(LlmClientError::ApiRequestFailed(error));
        }

        Ok(generated.response)
    }

    #[tracing::instrument(
        skip(self, prompt),
        fields(model = %self.model, prompt_chars = prompt.len())
    )]
    async fn complete_stream(&self, prompt: &str) -> Result<LlmTokenStream, LlmClientError> {
        let response = tokio::time::timeout(self.timeout, self.request(prompt, true).send())
            .await
            .map_err(|_| LlmClientError::Timeout)??;
        let response = ensure_success(response).await?;

        let mut lines = Box::pin(body_lines(response, self.timeout));

        let fragments = async_stream::stream! {
            while let Some(line) = lines.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let chunk: GenerateResponse = match serde_json::from_str(&line) {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(LlmClientError::InvalidResponse(e.to_string()));
                        return;
                    }
                };

                if let Some(error) = chunk.error {
                    yield Err(LlmClientError::ApiRequestFailed(error));
                    return;
                }

                if !chunk.response.is_empty() {
                    yield Ok(chunk.response);
                }

                if chunk.done {
                    return;
                }
            }

            yield Err(LlmClientError::InvalidResponse(STREAM_TRUNCATED.to_string()));
        };

        Ok(Box::pin(fragments))
    }
}
