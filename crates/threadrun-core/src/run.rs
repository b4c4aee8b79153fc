//! Runs and their observed lifecycle.
//!
//! The remote service owns a run's lifecycle; this side only observes it by
//! polling. [`RunStatus`] classifies each observed value as still running,
//! completed, or finished without success.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{AssistantId, RunId, ThreadId};

/// Lifecycle status of a run as reported by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Accepted, waiting for capacity.
    Queued,
    /// Executing.
    InProgress,
    /// Paused waiting for tool outputs.
    RequiresAction,
    /// Cancellation requested, not yet effective.
    Cancelling,
    /// Cancelled.
    Cancelled,
    /// Failed; see [`Run::last_error`].
    Failed,
    /// Finished successfully.
    Completed,
    /// Stopped early (token limits and similar).
    Incomplete,
    /// Timed out on the remote side.
    Expired,
    /// A value this version does not know.
    Unknown(String),
}

impl RunStatus {
    /// Parse a wire value. Unrecognized values become [`RunStatus::Unknown`].
    pub fn from_wire(value: &str) -> Self {
        match value {
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "requires_action" => Self::RequiresAction,
            "cancelling" => Self::Cancelling,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            "completed" => Self::Completed,
            "incomplete" => Self::Incomplete,
            "expired" => Self::Expired,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
            Self::Expired => "expired",
            Self::Unknown(other) => other,
        }
    }

    /// Whether polling should continue after observing this status.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Queued | Self::InProgress | Self::Cancelling)
    }

    /// Whether this status means the run produced its output.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the run stopped without completing.
    pub fn is_unsuccessful(&self) -> bool {
        !self.is_running() && !self.is_success()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&value))
    }
}

/// Error detail attached to a failed run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLastError {
    /// Machine-readable code (`server_error`, `rate_limit_exceeded`, ...).
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

/// A run as returned by create/retrieve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Remote-assigned run ID.
    pub id: RunId,
    /// Current status.
    pub status: RunStatus,
    /// Thread the run executes against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadId>,
    /// Assistant driving the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<AssistantId>,
    /// Instruction override, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Failure detail when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RunLastError>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
