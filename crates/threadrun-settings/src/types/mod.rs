//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` for the JSON file
//! format. Each type implements [`Default`] with production values, and
//! `#[serde(default)]` allows partial JSON: missing fields keep their default.

mod api;
mod orchestration;
mod server;

pub use api::*;
pub use orchestration::*;
pub use server::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// Example file:
///
/// ```json
/// {
///   "server": { "port": 9000 },
///   "orchestration": { "pollIntervalMs": 1000 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreadrunSettings {
    /// Inbound HTTP server settings.
    pub server: ServerSettings,
    /// Remote provider connection settings.
    pub openai: OpenAiSettings,
    /// Run polling policy.
    pub orchestration: OrchestrationSettings,
    /// Stateless chat endpoint parameters.
    pub chat: ChatSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl ThreadrunSettings {
    /// Reject values that would make the service misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.openai.base_url.trim().is_empty() {
            return Err(SettingsError::InvalidValue("openai.baseUrl is empty".into()));
        }
        if self.openai.request_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "openai.requestTimeoutSecs must be positive".into(),
            ));
        }
        if self.openai.connect_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "openai.connectTimeoutSecs must be positive".into(),
            ));
        }
        if self.orchestration.poll_interval_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "orchestration.pollIntervalMs must be positive".into(),
            ));
        }
        if self.orchestration.poll_timeout_ms < self.orchestration.poll_interval_ms {
            return Err(SettingsError::InvalidValue(
                "orchestration.pollTimeoutMs must be at least pollIntervalMs".into(),
            ));
        }
        if self.orchestration.max_polls == Some(0) {
            return Err(SettingsError::InvalidValue(
                "orchestration.maxPolls must be positive when set".into(),
            ));
        }
        Ok(())
    }

    /// The configured API key, or [`SettingsError::MissingApiKey`].
    pub fn require_api_key(&self) -> Result<&str> {
        self.openai
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingApiKey)
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Filter directive (`info`, `threadrun_runtime=debug`, ...).
    pub level: String,
    /// Emit newline-delimited JSON instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
