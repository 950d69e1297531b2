//! Support chat server binary.

use std::sync::Arc;

use tokio::net::TcpListener;

use support_chat::adapters::ai::{GroqConfig, GroqProvider, UnconfiguredProvider};
use support_chat::adapters::http::{build_router, ChatAppState, RouterConfig};
use support_chat::adapters::postgres::{connect_pool, run_migrations, PostgresConversationStore};
use support_chat::application::handlers::chat::{
    GenerationSettings, GetHistoryHandler, ReplyGenerator, SendMessageHandler,
};
use support_chat::config::{AppConfig, LlmConfig};
use support_chat::domain::conversation::KnowledgePreamble;
use support_chat::ports::{AIProvider, ConversationStore};
use support_chat::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server.log_level, config.server.log_format)?;

    tracing::info!(database = %config.database.redacted_url(), "Connecting to database");
    let pool = connect_pool(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    let store: Arc<dyn ConversationStore> = Arc::new(PostgresConversationStore::new(pool));

    let preamble = match &config.llm.knowledge_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading knowledge preamble");
            KnowledgePreamble::from_file(path).await?
        }
        None => KnowledgePreamble::builtin(),
    };

    let generator = ReplyGenerator::new(build_provider(&config.llm), preamble).with_settings(
        GenerationSettings {
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            deadline: Some(config.llm.retry_budget()),
        },
    );

    let state = ChatAppState::new(
        SendMessageHandler::new(store.clone(), generator)
            .with_limits(config.chat.history_window, config.chat.max_message_chars),
        GetHistoryHandler::new(store),
    );
    let app = build_router(state, &RouterConfig::from(&config.server));

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Support chat server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the Groq provider, or a stand-in that reports the misconfiguration
/// on every request when no usable API key is set.
fn build_provider(config: &LlmConfig) -> Arc<dyn AIProvider> {
    let Some(api_key) = config.api_key() else {
        tracing::error!("LLM API key is not set; chat replies will report a configuration error");
        return Arc::new(UnconfiguredProvider::new("Groq API key is missing"));
    };

    let groq = GroqConfig::new(api_key)
        .with_model(&config.model)
        .with_base_url(&config.base_url)
        .with_timeout(config.timeout())
        .with_max_retries(config.max_retries);

    match GroqProvider::new(groq) {
        Ok(provider) => {
            tracing::info!(model = %config.model, "Groq provider configured");
            Arc::new(provider)
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to configure Groq provider");
            Arc::new(UnconfiguredProvider::new(err.to_string()))
        }
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
