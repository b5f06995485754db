use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};

use super::http_body::{STREAM_TRUNCATED, body_lines, ensure_success};

const SSE_DATA_PREFIX: &str = "data:";
const SSE_DONE: &str = "[DONE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    Bearer,
    ApiKeyHeader,
}

/// Client for `/chat/completions` servers: OpenAI, Azure OpenAI, LM Studio.
///
/// The prompt is sent as a single user message.
pub struct OpenAiCompatibleClient {
    client: Client,
    base_url: String,
    api_key: String,
    auth_style: AuthStyle,
    model: String,
    max_tokens: usize,
    temperature: f32,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleClient {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_url: &str,
        api_key: String,
        auth_style: AuthStyle,
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
            api_key,
            auth_style,
            model,
            max_tokens,
            temperature,
            timeout,
        })
    }

    fn request(&self, prompt: &str, stream: Option<bool>) -> reqwest::RequestBuilder {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream,
        };

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);

        match self.auth_style {
            AuthStyle::ApiKeyHeader => request.header("api-key", &self.api_key),
            AuthStyle::Bearer => request.bearer_auth(&self.api_key),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    #[tracing::instrument(
        skip(self, prompt),
        fields(model = %self.model, prompt_chars = prompt.len())
    )]
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let response = self
            .request(prompt, None)
            .timeout(self.timeout)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmClientError::Timeout
            } else {
                LlmClientError::InvalidResponse(e.to_string())
            }
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }

    #[tracing::instrument(
        skip(self, prompt),
        fields(model = %self.model, prompt_chars = prompt.len())
    )]
    async fn complete_stream(&self, prompt: &str) -> Result<LlmTokenStream, LlmClientError> {
        let response = tokio::time::timeout(self.timeout, self.request(prompt, Some(true)).send())
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

                let Some(data) = line.strip_prefix(SSE_DATA_PREFIX) else {
                    continue;
                };
                let data = data.trim();

                if data == SSE_DONE {
                    return;
                }

                match serde_json::from_str::<ChatCompletionChunk>(data) {
                    Ok(chunk) => {
                        let content = chunk
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|choice| choice.delta.content);
                        if let Some(content) = content.filter(|c| !c.is_empty()) {
                            yield Ok(content);
                        }
                    }
                    Err(e) => {
                        yield Err(LlmClientError::InvalidResponse(e.to_string()));
                        return;
                    }
                }
            }

            yield Err(LlmClientError::InvalidResponse(STREAM_TRUNCATED.to_string()));
        };

        Ok(Box::pin(fragments))
    }
}
