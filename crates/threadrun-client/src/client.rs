//! [`OpenAiClient`]: the HTTP implementation of [`ConversationApi`] plus the
//! stateless passthrough calls.
//!
//! One `reqwest::Client` is built at startup and shared by every request; it
//! pools connections and is safe for concurrent use. Headers are built once:
//! the bearer credential on every call, and the `OpenAI-Beta` marker on
//! assistants/threads/messages/runs calls only.
//!
//! Request paths are built segment by segment on the parsed base URL, so an
//! ID containing `/`, `?` or `#` stays inside its own segment.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use threadrun_core::constants::{ASSISTANTS_BETA, DEFAULT_OPENAI_BASE_URL};
use threadrun_core::{
    AssistantId, MessageList, NewAssistant, RawJson, RemoteError, RemoteResult, Role, Run,
    RunId, ThreadId, ThreadMessage,
};
use threadrun_settings::OpenAiSettings;

use crate::api::ConversationApi;
use crate::chat::{ChatCompletion, ChatCompletionRequest};
use crate::errors::ClientError;

const OPENAI_BETA: &str = "openai-beta";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Connection parameters for [`OpenAiClient`].
#[derive(Clone, Debug)]
pub struct OpenAiClientConfig {
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Bearer credential.
    pub api_key: SecretString,
    /// `OpenAI-Beta` header value for assistants endpoints.
    pub assistants_beta: String,
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
}

impl OpenAiClientConfig {
    /// Default endpoint and timeouts with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: SecretString::from(api_key.into()),
            assistants_beta: ASSISTANTS_BETA.to_string(),
            request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Build from loaded settings and an already-resolved key.
    pub fn from_settings(settings: &OpenAiSettings, api_key: &str) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::from(api_key.to_string()),
            assistants_beta: settings.assistants_beta.clone(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs),
        }
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Build request headers.
///
/// `beta` adds the `OpenAI-Beta` marker. The authorization value is flagged
/// sensitive so it never shows up in `Debug` output.
pub fn build_headers(api_key: &SecretString, beta: Option<&str>) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
        .map_err(|_| ClientError::InvalidHeader {
            name: "authorization",
        })?;
    auth.set_sensitive(true);
    let _ = headers.insert(AUTHORIZATION, auth);
    let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(beta) = beta {
        let value = HeaderValue::from_str(beta)
            .map_err(|_| ClientError::InvalidHeader { name: OPENAI_BETA })?;
        let _ = headers.insert(OPENAI_BETA, value);
    }

    Ok(headers)
}

fn parse_base_url(base_url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };
    let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".into()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".into()));
    }
    Ok(url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the remote conversation service.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    /// `base_url` parsed; every request URL is derived from it.
    base: Url,
    /// Bearer + JSON content type.
    plain_headers: HeaderMap,
    /// `plain_headers` + `OpenAI-Beta`.
    assistants_headers: HeaderMap,
}

impl OpenAiClient {
    /// Create a client. Fails on an unusable base URL, header value or TLS setup.
    pub fn new(config: OpenAiClientConfig) -> Result<Self, ClientError> {
        let base = parse_base_url(&config.base_url)?;
        let plain_headers = build_headers(&config.api_key, None)?;
        let assistants_headers = build_headers(&config.api_key, Some(config.assistants_beta.as_str()))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        info!(base_url = %config.base_url, "remote client initialized");

        Ok(Self {
            http,
            base_url: config.base_url,
            base,
            plain_headers,
            assistants_headers,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus `segments`, each percent-encoded as a single segment.
    ///
    /// Empty and dot segments are refused: the URL parser would drop or
    /// resolve them and the request would reach a different resource.
    fn endpoint(&self, op: &'static str, segments: &[&str]) -> RemoteResult<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            warn!(op, segment = *bad, "refusing unusable path segment");
            return Err(RemoteError::transport(format!(
                "{op}: unusable path segment {bad:?}"
            )));
        }

        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                RemoteError::transport(format!("{op}: base URL cannot carry a path"))
            })?;
            let _ = path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn assistants_get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).headers(self.assistants_headers.clone())
    }

    fn assistants_post(&self, url: Url, body: &Value) -> RequestBuilder {
        self.http
            .post(url)
            .headers(self.assistants_headers.clone())
            .json(body)
    }

    /// Send one request and return the 2xx body as received.
    async fn execute(&self, op: &'static str, request: RequestBuilder) -> RemoteResult<RawJson> {
        let response = request.send().await.map_err(|e| {
            warn!(op, error = %e, "remote request failed");
            RemoteError::transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| {
                warn!(op, status = status.as_u16(), error = %e, "remote error body unreadable");
                RemoteError::transport(format!(
                    "{op}: status {} with unreadable body: {e}",
                    status.as_u16()
                ))
            })?;
            warn!(op, status = status.as_u16(), "remote rejected request");
            return Err(RemoteError::from_status(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::transport(e.to_string()))?;
        debug!(op, status = status.as_u16(), bytes = body.len(), "remote call succeeded");

        RawJson::parse(body).map_err(|e| RemoteError::decode(format!("{op}: {e}")))
    }

    async fn execute_as<T: DeserializeOwned>(
        &self,
        op: &'static str,
        request: RequestBuilder,
    ) -> RemoteResult<T> {
        let raw = self.execute(op, request).await?;
        serde_json::from_str(raw.as_str()).map_err(|e| RemoteError::decode(format!("{op}: {e}")))
    }

    // ── Passthroughs ────────────────────────────────────────────────

    /// `POST /assistants`. Returns the raw remote body.
    pub async fn create_assistant(&self, assistant: &NewAssistant) -> RemoteResult<RawJson> {
        let body = assistant.to_request_body();
        let url = self.endpoint("create_assistant", &["assistants"])?;
        self.execute("create_assistant", self.assistants_post(url, &body))
            .await
    }

    /// `POST /threads` with an empty body. Returns the raw remote body.
    pub async fn create_thread(&self) -> RemoteResult<RawJson> {
        let url = self.endpoint("create_thread", &["threads"])?;
        self.execute("create_thread", self.assistants_post(url, &json!({})))
            .await
    }

    /// Append a user message. Returns the raw remote body.
    pub async fn add_message(&self, thread_id: &ThreadId, prompt: &str) -> RemoteResult<RawJson> {
        let body = json!({ "role": Role::User, "content": prompt });
        let url = self.endpoint("add_message", &["threads", thread_id.as_str(), "messages"])?;
        self.execute("add_message", self.assistants_post(url, &body))
            .await
    }

    /// `POST /chat/completions`. Sends the bearer header only.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> RemoteResult<ChatCompletion> {
        let url = self.endpoint("chat_completion", &["chat", "completions"])?;
        let builder = self
            .http
            .post(url)
            .headers(self.plain_headers.clone())
            .json(request);
        self.execute_as("chat_completion", builder).await
    }
}

#[async_trait]
impl ConversationApi for OpenAiClient {
    async fn append_message(
        &self,
        thread_id: &ThreadId,
        role: Role,
        content: &str,
    ) -> RemoteResult<ThreadMessage> {
        let body = json!({ "role": role, "content": content });
        let url = self.endpoint("append_message", &["threads", thread_id.as_str(), "messages"])?;
        self.execute_as("append_message", self.assistants_post(url, &body))
            .await
    }

    async fn start_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &AssistantId,
        instructions: Option<&str>,
    ) -> RemoteResult<Run> {
        let mut body = json!({ "assistant_id": assistant_id });
        if let Some(instructions) = instructions {
            body["instructions"] = Value::String(instructions.to_string());
        }
        let url = self.endpoint("start_run", &["threads", thread_id.as_str(), "runs"])?;
        self.execute_as("start_run", self.assistants_post(url, &body))
            .await
    }

    async fn get_run(&self, thread_id: &ThreadId, run_id: &RunId) -> RemoteResult<Run> {
        let url = self.endpoint(
            "get_run",
            &["threads", thread_id.as_str(), "runs", run_id.as_str()],
        )?;
        self.execute_as("get_run", self.assistants_get(url)).await
    }

    async fn list_messages(&self, thread_id: &ThreadId) -> RemoteResult<MessageList> {
        let url = self.endpoint("list_messages", &["threads", thread_id.as_str(), "messages"])?;
        let raw = self
            .execute("list_messages", self.assistants_get(url))
            .await?;
        MessageList::from_raw(raw).map_err(|e| RemoteError::decode(format!("list_messages: {e}")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
