mod http_body;
mod llm_client_factory;
mod ollama_client;
mod openai_compatible_client;

pub use llm_client_factory::{LlmClientFactory, LlmClientFactoryError};
pub use ollama_client::OllamaClient;
pub use openai_compatible_client::{AuthStyle, OpenAiCompatibleClient};
