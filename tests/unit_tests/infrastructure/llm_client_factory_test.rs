use cleverbot::infrastructure::llm::{LlmClientFactory, LlmClientFactoryError};
use cleverbot::presentation::config::{LlmProvider, LlmSettings};

fn settings(provider: LlmProvider) -> LlmSettings {
    LlmSettings {
        provider,
        base_url: None,
        azure_endpoint: None,
        api_key: String::new(),
        model: "smollm2:360m".to_string(),
        max_tokens: 2000,
        temperature: 0.3,
        streaming: false,
        request_timeout_seconds: 30,
    }
}

#[test]
fn given_ollama_without_base_url_when_creating_then_uses_local_default() {
    assert!(LlmClientFactory::create(&settings(LlmProvider::Ollama)).is_ok());
}

#[test]
fn given_openai_without_key_when_creating_then_missing_api_key() {
    let result = LlmClientFactory::create(&settings(LlmProvider::OpenAi));

    assert!(matches!(
        result,
        Err(LlmClientFactoryError::MissingApiKey("openai"))
    ));
}

#[test]
fn given_openai_with_key_when_creating_then_succeeds() {
    let mut settings = settings(LlmProvider::OpenAi);
    settings.api_key = "sk-test".to_string();

    assert!(LlmClientFactory::create(&settings).is_ok());
}

#[test]
fn given_lmstudio_without_base_url_when_creating_then_missing_base_url() {
    let result = LlmClientFactory::create(&settings(LlmProvider::LmStudio));

    assert!(matches!(result, Err(LlmClientFactoryError::MissingBaseUrl)));
}

#[test]
fn given_azure_without_endpoint_when_creating_then_missing_endpoint() {
    let mut settings = settings(LlmProvider::Azure);
    settings.api_key = "key".to_string();

    let result = LlmClientFactory::create(&settings);

    assert!(matches!(
        result,
        Err(LlmClientFactoryError::MissingAzureEndpoint)
    ));
}

#[test]
fn given_azure_without_key_when_creating_then_missing_api_key() {
    let mut settings = settings(LlmProvider::Azure);
    settings.azure_endpoint = Some("https://example.openai.azure.com".to_string());

    let result = LlmClientFactory::create(&settings);

    assert!(matches!(
        result,
        Err(LlmClientFactoryError::MissingApiKey("azure"))
    ));
}
