//! Remote provider settings.
//!
//! Connection details for the provider API plus the fixed parameters of the
//! stateless chat endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};
use threadrun_core::constants::{ASSISTANTS_BETA, DEFAULT_OPENAI_BASE_URL};

/// Remote provider connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiSettings {
    /// Base URL of the API (no trailing slash).
    pub base_url: String,
    /// API key. Normally supplied through `OPENAI_API_KEY`; never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Value of the `OpenAI-Beta` header on assistants endpoints.
    pub assistants_beta: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: None,
            assistants_beta: ASSISTANTS_BETA.to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
        }
    }
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("assistants_beta", &self.assistants_beta)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Parameters of the stateless chat endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatSettings {
    /// Model ID.
    pub model: String,
    /// System message prepended to every prompt.
    pub system_prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Nucleus sampling.
    pub top_p: f64,
    /// Frequency penalty.
    pub frequency_penalty: f64,
    /// Presence penalty.
    pub presence_penalty: f64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            system_prompt: "You are a Psychiatrist who can identify mental health".to_string(),
            temperature: 1.0,
            max_tokens: 256,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_not_serialized() {
        let settings = OpenAiSettings {
            api_key: Some("sk-secret".into()),
            ..OpenAiSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("apiKey"));
    }

    #[test]
    fn api_key_is_deserialized() {
        let settings: OpenAiSettings = serde_json::from_str(r#"{"apiKey": "sk-file"}"#).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-file"));
        assert_eq!(settings.assistants_beta, "assistants=v2");
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = OpenAiSettings {
            api_key: Some("sk-secret".into()),
            ..OpenAiSettings::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn chat_defaults() {
        let chat = ChatSettings::default();
        assert_eq!(chat.model, "gpt-4");
        assert!((chat.temperature - 1.0).abs() < f64::EPSILON);
        assert!((chat.top_p - 1.0).abs() < f64::EPSILON);
        assert!(chat.system_prompt.contains("Psychiatrist"));
    }
}
