use std::time::Duration;

use cleverbot::application::services::OutputFormat;
use cleverbot::presentation::config::{
    DEFAULT_GREETING, Environment, LlmProvider, ServerSettings, Settings,
};

#[test]
fn given_no_overrides_when_loading_then_uses_built_in_defaults() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.llm.provider, LlmProvider::Ollama);
    assert_eq!(settings.llm.model, "smollm2:360m");
    assert_eq!(settings.llm.max_tokens, 2000);
    assert!((settings.llm.temperature - 0.3).abs() < f32::EPSILON);
    assert!(!settings.llm.streaming);
    assert!(settings.llm.base_url.is_none());
    assert_eq!(settings.chat.greeting, DEFAULT_GREETING);
    assert_eq!(settings.chat.typing_delay_ms, 50);
    assert_eq!(settings.chat.default_format, OutputFormat::Markdown);
    assert_eq!(
        settings.chat.session_idle_ttl(),
        Some(Duration::from_secs(3600))
    );
}

#[test]
fn given_zero_session_ttl_when_resolving_then_sessions_do_not_expire() {
    let mut settings = Settings::load(Environment::Test).unwrap();
    settings.chat.session_ttl_seconds = 0;

    assert!(settings.chat.session_idle_ttl().is_none());
}

#[test]
fn given_upload_limit_in_megabytes_when_converting_then_returns_bytes() {
    let server = ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 8080,
        max_upload_mb: 25,
    };

    assert_eq!(server.max_upload_bytes(), 25 * 1024 * 1024);
}
