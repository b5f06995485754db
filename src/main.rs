use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use cleverbot::application::services::{ChatService, TypingRenderer};
use cleverbot::infrastructure::llm::LlmClientFactory;
use cleverbot::infrastructure::observability::{TracingConfig, init_tracing};
use cleverbot::infrastructure::persistence::InMemorySessionRepository;
use cleverbot::infrastructure::text_processing::PdfAdapter;
use cleverbot::presentation::{AppState, Environment, Settings, create_router};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::from_settings(&settings.logging, environment))
        .context("Failed to initialize tracing")?;

    tracing::info!(
        environment = %environment,
        provider = ?settings.llm.provider,
        model = %settings.llm.model,
        streaming = settings.llm.streaming,
        "Application starting"
    );

    let llm_client = LlmClientFactory::create(&settings.llm)?;
    let file_loader = Arc::new(PdfAdapter::new());
    let session_repository = Arc::new(match settings.chat.session_idle_ttl() {
        Some(ttl) => InMemorySessionRepository::with_idle_ttl(ttl),
        None => InMemorySessionRepository::new(),
    });
    if let Some(ttl) = settings.chat.session_idle_ttl() {
        session_repository.spawn_eviction(SESSION_SWEEP_INTERVAL.min(ttl));
    }

    let chat_service = Arc::new(ChatService::new(
        file_loader,
        llm_client,
        session_repository.clone(),
        settings.chat.greeting.clone(),
        settings.llm.streaming,
    ));

    let state = AppState {
        chat_service,
        typing_renderer: TypingRenderer::new(Duration::from_millis(
            settings.chat.typing_delay_ms,
        )),
        default_format: settings.chat.default_format,
        max_upload_bytes: settings.server.max_upload_bytes(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
