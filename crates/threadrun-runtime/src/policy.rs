//! Poll policy for step 3 of the workflow.

use std::time::Duration;

use threadrun_settings::OrchestrationSettings;

/// How often and for how long a run is polled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before each status fetch.
    pub interval: Duration,
    /// Polling deadline, measured from the first wait.
    pub timeout: Duration,
    /// Optional cap on status fetches.
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(600),
            max_polls: None,
        }
    }
}

impl PollPolicy {
    /// Build from loaded settings.
    pub fn from_settings(settings: &OrchestrationSettings) -> Self {
        Self {
            interval: settings.poll_interval(),
            timeout: settings.poll_timeout(),
            max_polls: settings.max_polls,
        }
    }

    /// Whether another fetch may be scheduled after `polls` fetches and
    /// `elapsed` time spent polling. The next fetch happens one interval from
    /// now and must not land past the deadline.
    pub fn allows_another(&self, polls: u32, elapsed: Duration) -> bool {
        if self.max_polls.is_some_and(|max| polls >= max) {
            return false;
        }
        elapsed.saturating_add(self.interval) <= self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.timeout, Duration::from_secs(600));
        assert!(policy.max_polls.is_none());
    }

    #[test]
    fn from_default_settings_matches_default() {
        assert_eq!(
            PollPolicy::from_settings(&OrchestrationSettings::default()),
            PollPolicy::default()
        );
    }

    #[test]
    fn deadline_bounds_fetches() {
        let policy = PollPolicy {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
            max_polls: None,
        };
        assert!(policy.allows_another(0, Duration::ZERO));
        assert!(policy.allows_another(1, Duration::from_secs(2)));
        assert!(!policy.allows_another(2, Duration::from_secs(4)));
    }

    #[test]
    fn cap_bounds_fetches() {
        let policy = PollPolicy {
            max_polls: Some(2),
            ..PollPolicy::default()
        };
        assert!(policy.allows_another(1, Duration::ZERO));
        assert!(!policy.allows_another(2, Duration::ZERO));
    }
}
