//! Route handlers and inbound request bodies.
//!
//! Passthrough handlers make one remote call and answer with the remote body
//! byte for byte. `create_run` drives the full orchestration. Malformed JSON
//! is rejected by axum's `Json` extractor before a handler runs.

use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracing::{debug, instrument};

use threadrun_client::{ChatCompletion, ChatCompletionRequest};
use threadrun_core::{AssistantId, NewAssistant, RawJson, ThreadId};
use threadrun_runtime::RunRequest;

use crate::error::ApiError;
use crate::health::{self, HealthResponse};
use crate::server::AppState;

// ── Request bodies ──────────────────────────────────────────────────────────

/// `POST /api/assistant/add-message`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageBody {
    /// Target thread.
    pub thread_id: String,
    /// User message text.
    pub prompt: String,
}

/// `POST /api/assistant/create-run`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRunBody {
    /// Target thread.
    pub thread_id: String,
    /// Assistant to run.
    pub assistant_id: String,
    /// Optional instruction override.
    #[serde(default)]
    pub instructions: Option<String>,
    /// User message text.
    pub user_prompt: String,
}

/// `POST /api/mental-health/chat`
#[derive(Clone, Debug, Deserialize)]
pub struct ChatBody {
    /// User prompt.
    pub prompt: String,
}

/// Accept a caller-supplied remote ID.
///
/// Remote IDs are `[A-Za-z0-9_-]+`. Anything else is refused before it can
/// reach a request path.
fn remote_id(field: &str, value: String) -> Result<String, ApiError> {
    if value.is_empty() {
        return Err(ApiError::InvalidRequest(format!("{field} must not be empty")));
    }
    if !value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(ApiError::InvalidRequest(format!(
            "{field} may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(value)
}

impl CreateRunBody {
    fn into_request(self) -> Result<RunRequest, ApiError> {
        Ok(RunRequest {
            thread_id: ThreadId::from_string(remote_id("threadId", self.thread_id)?),
            assistant_id: AssistantId::from_string(remote_id("assistantId", self.assistant_id)?),
            instructions: self.instructions,
            user_prompt: self.user_prompt,
        })
    }
}

/// A remote body sent back exactly as received.
#[derive(Debug)]
pub struct RemoteBody(pub RawJson);

impl IntoResponse for RemoteBody {
    fn into_response(self) -> Response {
        (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            self.0.into_string(),
        )
            .into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.orchestrator.in_flight(),
    ))
}

/// POST /api/assistant/create-assistant
#[instrument(skip_all, fields(model = %body.model))]
pub async fn create_assistant(
    State(state): State<AppState>,
    Json(body): Json<NewAssistant>,
) -> Result<RemoteBody, ApiError> {
    let created = state.client.create_assistant(&body).await?;
    debug!(bytes = created.len(), "assistant created");
    Ok(RemoteBody(created))
}

/// POST /api/assistant/create-thread
#[instrument(skip_all)]
pub async fn create_thread(State(state): State<AppState>) -> Result<RemoteBody, ApiError> {
    Ok(RemoteBody(state.client.create_thread().await?))
}

/// POST /api/assistant/add-message
#[instrument(skip_all, fields(thread_id = %body.thread_id))]
pub async fn add_message(
    State(state): State<AppState>,
    Json(body): Json<AddMessageBody>,
) -> Result<RemoteBody, ApiError> {
    let thread_id = ThreadId::from_string(remote_id("threadId", body.thread_id)?);
    Ok(RemoteBody(state.client.add_message(&thread_id, &body.prompt).await?))
}

/// POST /api/assistant/create-run
///
/// The orchestration's token is a child of the shutdown token. If the caller
/// disconnects, axum drops this future and the chain stops at its current
/// await point.
#[instrument(skip_all, fields(thread_id = %body.thread_id, assistant_id = %body.assistant_id))]
pub async fn create_run(
    State(state): State<AppState>,
    Json(body): Json<CreateRunBody>,
) -> Result<RemoteBody, ApiError> {
    let request = body.into_request()?;
    let cancel = state.shutdown.run_token();
    let result = state.orchestrator.run(&request, &cancel).await?;
    Ok(RemoteBody(result.messages.into_raw()))
}

/// POST /api/mental-health/chat
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatCompletion>, ApiError> {
    let request = ChatCompletionRequest::from_prompt(&state.chat, &body.prompt);
    let completion = state.client.chat_completion(&request).await?;
    debug!(
        completion_id = %completion.id,
        choices = completion.choices.len(),
        "chat completion received"
    );
    Ok(Json(completion))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_run_body_camel_case() {
        let body: CreateRunBody = serde_json::from_str(
            r#"{"threadId": "thread_1", "assistantId": "asst_1", "userPrompt": "hi"}"#,
        )
        .unwrap();
        let request = body.into_request().unwrap();
        assert_eq!(request.thread_id.as_str(), "thread_1");
        assert_eq!(request.assistant_id.as_str(), "asst_1");
        assert!(request.instructions.is_none());
        assert_eq!(request.user_prompt, "hi");
    }

    #[test]
    fn blank_ids_rejected() {
        let body = CreateRunBody {
            thread_id: " ".into(),
            assistant_id: "asst_1".into(),
            instructions: None,
            user_prompt: "hi".into(),
        };
        assert!(matches!(body.into_request(), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn ids_outside_charset_rejected() {
        for id in ["../assistants?x=", "thread 1", "thread/1", "thread#1", "..", "thréad"] {
            let result = remote_id("threadId", id.to_string());
            assert!(matches!(result, Err(ApiError::InvalidRequest(_))), "{id}");
        }
    }

    #[test]
    fn remote_shaped_ids_accepted() {
        for id in ["thread_abc123", "asst_X-9", "run-1"] {
            assert_eq!(remote_id("threadId", id.to_string()).unwrap(), id);
        }
    }

    #[tokio::test]
    async fn remote_body_sent_verbatim() {
        let raw = r#"{"z":1,"score":0.1000000000000000055511151231257827,"a":null}"#;
        let resp = RemoteBody(RawJson::parse(raw.to_string()).unwrap()).into_response();
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        assert_eq!(&body[..], raw.as_bytes());
    }

    #[test]
    fn missing_user_prompt_fails_to_parse() {
        let result: Result<CreateRunBody, _> =
            serde_json::from_str(r#"{"threadId": "thread_1", "assistantId": "asst_1"}"#);
        assert!(result.is_err());
    }
}
