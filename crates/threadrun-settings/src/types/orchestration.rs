//! Run polling policy settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the orchestrator waits for a run to finish.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrchestrationSettings {
    /// Delay before each status fetch, in milliseconds.
    pub poll_interval_ms: u64,
    /// Overall polling deadline, in milliseconds.
    pub poll_timeout_ms: u64,
    /// Optional cap on the number of status fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_polls: Option<u32>,
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            poll_timeout_ms: 600_000,
            max_polls: None,
        }
    }
}

impl OrchestrationSettings {
    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Polling deadline as a [`Duration`].
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        let s = OrchestrationSettings::default();
        assert_eq!(s.poll_interval(), Duration::from_secs(2));
        assert_eq!(s.poll_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn max_polls_from_json() {
        let s: OrchestrationSettings = serde_json::from_str(r#"{"maxPolls": 30}"#).unwrap();
        assert_eq!(s.max_polls, Some(30));
        assert_eq!(s.poll_interval_ms, 2000);
    }
}
