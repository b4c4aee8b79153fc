//! `ThreadrunServer`: Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use threadrun_client::{ClientError, ConversationApi, OpenAiClient, OpenAiClientConfig};
use threadrun_runtime::{PollPolicy, RunOrchestrator};
use threadrun_settings::{ChatSettings, ThreadrunSettings};

use crate::config::ServerConfig;
use crate::handlers;
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Remote client for passthrough calls.
    pub client: Arc<OpenAiClient>,
    /// Orchestrator for `create-run`.
    pub orchestrator: RunOrchestrator,
    /// Chat endpoint parameters.
    pub chat: Arc<ChatSettings>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
}

/// The threadrun HTTP server.
pub struct ThreadrunServer {
    config: ServerConfig,
    state: AppState,
}

impl ThreadrunServer {
    /// Create a server around an existing client and orchestrator.
    pub fn new(
        config: ServerConfig,
        client: Arc<OpenAiClient>,
        orchestrator: RunOrchestrator,
        chat: ChatSettings,
    ) -> Self {
        let state = AppState {
            client,
            orchestrator,
            chat: Arc::new(chat),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
        };
        Self { config, state }
    }

    /// Wire client, orchestrator and server from loaded settings.
    ///
    /// One pooled client serves both the passthroughs and the orchestrator.
    pub fn from_settings(settings: &ThreadrunSettings, api_key: &str) -> Result<Self, ClientError> {
        let client = Arc::new(OpenAiClient::new(OpenAiClientConfig::from_settings(
            &settings.openai,
            api_key,
        ))?);
        let api: Arc<dyn ConversationApi> = client.clone();
        let orchestrator =
            RunOrchestrator::new(api, PollPolicy::from_settings(&settings.orchestration));
        Ok(Self::new(
            ServerConfig::from(&settings.server),
            client,
            orchestrator,
            settings.chat.clone(),
        ))
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health_handler))
            .route(
                "/api/assistant/create-assistant",
                post(handlers::create_assistant),
            )
            .route("/api/assistant/create-thread", post(handlers::create_thread))
            .route("/api/assistant/add-message", post(handlers::add_message))
            .route("/api/assistant/create-run", post(handlers::create_run))
            .route("/api/mental-health/chat", post(handlers::chat))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind and serve in a background task.
    ///
    /// The task stops accepting connections once the shutdown coordinator
    /// fires and finishes when in-flight requests have drained.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let token = self.state.shutdown.token();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(token.cancelled_owned())
                .await
            {
                error!(error = %e, "server terminated with error");
            }
        });

        info!(%addr, "threadrun listening");
        Ok((addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.state.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_server(remote: &MockServer) -> ThreadrunServer {
        let mut settings = ThreadrunSettings::default();
        settings.openai.base_url = remote.uri();
        settings.server.port = 0;
        settings.orchestration.poll_interval_ms = 10;
        settings.orchestration.poll_timeout_ms = 1_000;
        ThreadrunServer::from_settings(&settings, "sk-test").unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ── Wiring ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn from_settings_wires_policy() {
        let remote = MockServer::start().await;
        let server = make_server(&remote);
        assert_eq!(server.config().port, 0);
        assert_eq!(
            server.state().orchestrator.policy().interval,
            Duration::from_millis(10)
        );
        assert_eq!(server.state().client.base_url(), remote.uri());
        assert!(!server.shutdown().is_shutting_down());
    }

    // ── Health / routing ────────────────────────────────────────────

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let remote = MockServer::start().await;
        let app = make_server(&remote).router();

        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["in_flight_runs"], 0);
        assert!(parsed["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let remote = MockServer::start().await;
        let app = make_server(&remote).router();

        let req = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_before_remote() {
        let remote = MockServer::start().await;
        let app = make_server(&remote).router();

        let resp = app
            .oneshot(post_json(
                "/api/assistant/create-run",
                &json!({"threadId": "thread_1"}),
            ))
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
        assert!(remote.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_thread_id_is_bad_request() {
        let remote = MockServer::start().await;
        let app = make_server(&remote).router();

        let resp = app
            .oneshot(post_json(
                "/api/assistant/add-message",
                &json!({"threadId": "", "prompt": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn path_like_ids_never_reach_remote() {
        let remote = MockServer::start().await;
        let app = make_server(&remote).router();

        let resp = app
            .clone()
            .oneshot(post_json(
                "/api/assistant/add-message",
                &json!({"threadId": "../assistants?x=", "prompt": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = app
            .oneshot(post_json(
                "/api/assistant/create-run",
                &json!({"threadId": "thread_1", "assistantId": "asst/1", "userPrompt": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let parsed: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("assistantId"));

        assert!(remote.received_requests().await.unwrap().is_empty());
    }

    // ── Passthroughs ────────────────────────────────────────────────

    #[tokio::test]
    async fn create_thread_returns_remote_body() {
        let remote = MockServer::start().await;
        let raw = r#"{"object":"thread","id":"thread_1","metadata":{},"created_at":1.0e9}"#;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_string(raw))
            .mount(&remote)
            .await;
        let app = make_server(&remote).router();

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/assistant/create-thread")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(body_string(resp).await, raw);
    }

    #[tokio::test]
    async fn create_assistant_rejection_passes_through() {
        let remote = MockServer::start().await;
        let raw = r#"{"error":{"message":"invalid model","type":"invalid_request_error"}}"#;
        Mock::given(method("POST"))
            .and(path("/assistants"))
            .respond_with(ResponseTemplate::new(400).set_body_string(raw))
            .mount(&remote)
            .await;
        let app = make_server(&remote).router();

        let resp = app
            .oneshot(post_json(
                "/api/assistant/create-assistant",
                &json!({"instructions": "x", "name": "n", "tools": ["code_interpreter"], "model": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, raw);
    }

    #[tokio::test]
    async fn chat_returns_parsed_completion() {
        let remote = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1,
                "model": "gpt-4",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "I hear you."}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
            })))
            .mount(&remote)
            .await;
        let app = make_server(&remote).router();

        let resp = app
            .oneshot(post_json(
                "/api/mental-health/chat",
                &json!({"prompt": "I can't sleep"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let parsed: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(parsed["choices"][0]["message"]["content"], "I hear you.");
        assert_eq!(parsed["usage"]["total_tokens"], 13);
    }

    // ── Orchestrated run ────────────────────────────────────────────

    #[tokio::test]
    async fn create_run_append_rejection_short_circuits() {
        let remote = MockServer::start().await;
        let raw = r#"{"error":{"message":"Rate limit reached"}}"#;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(429).set_body_string(raw))
            .expect(1)
            .mount(&remote)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/runs"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&remote)
            .await;
        let app = make_server(&remote).router();

        let resp = app
            .oneshot(post_json(
                "/api/assistant/create-run",
                &json!({"threadId": "thread_1", "assistantId": "asst_1", "userPrompt": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_string(resp).await, raw);
    }

    #[tokio::test]
    async fn create_run_after_shutdown_is_unavailable() {
        let remote = MockServer::start().await;
        let server = make_server(&remote);
        server.shutdown().shutdown();

        let resp = server
            .router()
            .oneshot(post_json(
                "/api/assistant/create-run",
                &json!({"threadId": "thread_1", "assistantId": "asst_1", "userPrompt": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(remote.received_requests().await.unwrap().is_empty());
    }
}
