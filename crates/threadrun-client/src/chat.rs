//! Chat completions request/response types.
//!
//! The stateless chat endpoint sends a fixed system prompt plus the caller's
//! prompt. Message content goes out as an array of typed parts; the reply is
//! parsed into [`ChatCompletion`] and handed back re-serialized.

use serde::{Deserialize, Serialize};
use threadrun_core::Role;
use threadrun_settings::ChatSettings;

/// One content part of an outgoing chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
}

/// An outgoing chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    /// Author role.
    pub role: Role,
    /// Content parts.
    pub content: Vec<ContentPart>,
}

impl RequestMessage {
    /// A message with a single text part.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model ID.
    pub model: String,
    /// Conversation so far.
    pub messages: Vec<RequestMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Nucleus sampling.
    pub top_p: f64,
    /// Frequency penalty.
    pub frequency_penalty: f64,
    /// Presence penalty.
    pub presence_penalty: f64,
}

impl ChatCompletionRequest {
    /// System prompt from `settings` followed by the user's `prompt`.
    pub fn from_prompt(settings: &ChatSettings, prompt: &str) -> Self {
        Self {
            model: settings.model.clone(),
            messages: vec![
                RequestMessage::text(Role::System, settings.system_prompt.clone()),
                RequestMessage::text(Role::User, prompt),
            ],
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            top_p: settings.top_p,
            frequency_penalty: settings.frequency_penalty,
            presence_penalty: settings.presence_penalty,
        }
    }
}

/// A reply message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: Role,
    /// Reply text. Absent for tool-call-only replies.
    #[serde(default)]
    pub content: Option<String>,
}

/// One completion alternative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Position among the alternatives.
    pub index: u32,
    /// The generated message.
    pub message: ChatMessage,
    /// Why generation stopped (`stop`, `length`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens.
    pub prompt_tokens: u32,
    /// Completion tokens.
    pub completion_tokens: u32,
    /// Sum of both.
    pub total_tokens: u32,
}

/// Parsed response of `POST /chat/completions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Completion ID.
    pub id: String,
    /// Object tag (`chat.completion`).
    pub object: String,
    /// Creation time (unix seconds).
    pub created: i64,
    /// Model that answered.
    pub model: String,
    /// Alternatives, usually one.
    pub choices: Vec<Choice>,
    /// Token accounting, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// Text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_from_default_settings() {
        let request = ChatCompletionRequest::from_prompt(&ChatSettings::default(), "I feel anxious");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4",
                "messages": [
                    {
                        "role": "system",
                        "content": [{"type": "text", "text": "You are a Psychiatrist who can identify mental health"}]
                    },
                    {
                        "role": "user",
                        "content": [{"type": "text", "text": "I feel anxious"}]
                    }
                ],
                "temperature": 1.0,
                "max_tokens": 256,
                "top_p": 1.0,
                "frequency_penalty": 0.0,
                "presence_penalty": 0.0
            })
        );
    }

    #[test]
    fn request_uses_configured_prompt() {
        let settings = ChatSettings {
            model: "gpt-4o".into(),
            system_prompt: "Be brief".into(),
            max_tokens: 32,
            ..ChatSettings::default()
        };
        let request = ChatCompletionRequest::from_prompt(&settings, "hi");
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 32);
        assert_eq!(request.messages[0], RequestMessage::text(Role::System, "Be brief"));
    }

    #[test]
    fn parses_completion() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4-0613",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Tell me more."},
                "logprobs": null,
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 4, "total_tokens": 24},
            "system_fingerprint": null
        }))
        .unwrap();
        assert_eq!(completion.first_text(), Some("Tell me more."));
        assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(completion.usage.unwrap().total_tokens, 24);
    }

    #[test]
    fn missing_usage_is_omitted_on_output() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-2",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4",
            "choices": []
        }))
        .unwrap();
        assert!(completion.first_text().is_none());
        let out = serde_json::to_value(&completion).unwrap();
        assert!(out.get("usage").is_none());
    }
}
