use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::presentation::config::{LlmProvider, LlmSettings};

use super::{AuthStyle, OllamaClient, OpenAiCompatibleClient};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum LlmClientFactoryError {
    #[error("missing API key: the {0} provider requires llm.api_key")]
    MissingApiKey(&'static str),
    #[error("base_url is required for the LM Studio provider")]
    MissingBaseUrl,
    #[error("azure_endpoint is required for the Azure provider")]
    MissingAzureEndpoint,
    #[error("client initialization failed: {0}")]
    InitializationFailed(#[from] LlmClientError),
}

pub struct LlmClientFactory;

impl LlmClientFactory {
    pub fn create(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>, LlmClientFactoryError> {
        let timeout = Duration::from_secs(settings.request_timeout_seconds);

        match settings.provider {
            LlmProvider::Ollama => {
                let base_url = settings.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
                tracing::info!(model = %settings.model, base_url, "Using Ollama inference client");
                Ok(Arc::new(OllamaClient::new(
                    base_url,
                    Some(settings.api_key.clone()),
                    settings.model.clone(),
                    settings.max_tokens,
                    settings.temperature,
                    timeout,
                )?))
            }
            LlmProvider::OpenAi => {
                if settings.api_key.is_empty() {
                    return Err(LlmClientFactoryError::MissingApiKey("openai"));
                }
                let base_url = settings.base_url.as_deref().unwrap_or(OPENAI_URL);
                tracing::info!(model = %settings.model, base_url, "Using OpenAI inference client");
                Self::chat_completions(settings, base_url, AuthStyle::Bearer, timeout)
            }
            LlmProvider::LmStudio => {
                let base_url = settings
                    .base_url
                    .as_deref()
                    .ok_or(LlmClientFactoryError::MissingBaseUrl)?;
                tracing::info!(
                    model = %settings.model,
                    base_url,
                    "Using LM Studio inference client"
                );
                Self::chat_completions(settings, base_url, AuthStyle::Bearer, timeout)
            }
            LlmProvider::Azure => {
                let endpoint = settings
                    .azure_endpoint
                    .as_deref()
                    .ok_or(LlmClientFactoryError::MissingAzureEndpoint)?;
                if settings.api_key.is_empty() {
                    return Err(LlmClientFactoryError::MissingApiKey("azure"));
                }
                let base_url = format!(
                    "{}/openai/deployments/{}",
                    endpoint.trim_end_matches('/'),
                    settings.model
                );
                tracing::info!(
                    model = %settings.model,
                    base_url = %base_url,
                    "Using Azure OpenAI inference client"
                );
                Self::chat_completions(settings, &base_url, AuthStyle::ApiKeyHeader, timeout)
            }
        }
    }

    fn chat_completions(
        settings: &LlmSettings,
        base_url: &str,
        auth_style: AuthStyle,
        timeout: Duration,
    ) -> Result<Arc<dyn LlmClient>, LlmClientFactoryError> {
        Ok(Arc::new(OpenAiCompatibleClient::new(
            base_url,
            settings.api_key.clone(),
            auth_style,
            settings.model.clone(),
            settings.max_tokens,
            settings.temperature,
            timeout,
        )?))
    }
}
