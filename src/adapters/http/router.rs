//! Top-level router assembly.
//!
//! Mounts the chat and health routes and wraps them in the shared HTTP
//! layers: request ids, tracing, compression, and CORS. The request timeout
//! applies to history and health only; `/chat/message` is bounded by the
//! reply generator's deadline so a slow model still ends in a stored apology
//! and a `{error, sessionId}` body.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::chat::{history_routes, message_routes, ChatAppState};
use super::health::health_routes;
use crate::config::ServerConfig;

/// Settings for the HTTP layers.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub request_timeout: Duration,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(90),
            cors_origins: Vec::new(),
        }
    }
}

impl From<&ServerConfig> for RouterConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            cors_origins: config.cors_origins_list(),
        }
    }
}

/// Builds the application router.
pub fn build_router(state: ChatAppState, config: &RouterConfig) -> Router {
    let bounded = history_routes()
        .merge(health_routes())
        .layer(TimeoutLayer::new(config.request_timeout));

    Router::new()
        .merge(message_routes())
        .merge(bounded)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&config.cors_origins)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::application::handlers::chat::{GetHistoryHandler, ReplyGenerator, SendMessageHandler};
    use crate::domain::conversation::KnowledgePreamble;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(config: RouterConfig) -> Router {
        app_with_provider(config, MockAIProvider::new())
    }

    fn app_with_provider(config: RouterConfig, provider: MockAIProvider) -> Router {
        let store = Arc::new(InMemoryConversationStore::new());
        let generator = ReplyGenerator::new(Arc::new(provider), KnowledgePreamble::builtin());
        let state = ChatAppState::new(
            SendMessageHandler::new(store.clone(), generator),
            GetHistoryHandler::new(store),
        );
        build_router(state, &config)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(RouterConfig::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn ping_returns_html() {
        let response = app(RouterConfig::default())
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("pong"));
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = app(RouterConfig::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let config = RouterConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };

        let response = app(config)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn slow_failing_model_is_not_cut_off_by_request_timeout() {
        let config = RouterConfig {
            request_timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let provider = MockAIProvider::new()
            .with_error(MockError::Timeout { timeout_secs: 30 })
            .with_delay(Duration::from_millis(300));

        let response = app_with_provider(config, provider)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/message")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("try again"));
        assert!(json["sessionId"].is_string());
    }

    #[tokio::test]
    async fn history_is_bounded_by_request_timeout() {
        let config = RouterConfig {
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        };

        let response = app(config)
            .oneshot(
                Request::builder()
                    .uri("/chat/history/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn router_config_from_server_config() {
        let server = ServerConfig {
            request_timeout_secs: 15,
            cors_origins: Some("https://shop.example".to_string()),
            ..Default::default()
        };

        let config = RouterConfig::from(&server);

        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.cors_origins, vec!["https://shop.example"]);
    }
}
