//! Orchestration error types.

use std::fmt;
use std::time::Duration;

use threadrun_core::errors::BAD_GATEWAY;
use threadrun_core::{RemoteError, RunId, RunLastError, RunStatus};

/// Workflow step, used to tag remote failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Appending the caller's message to the thread.
    AppendMessage,
    /// Creating the run.
    StartRun,
    /// Fetching run status.
    PollRun,
    /// Listing the thread's messages.
    ListMessages,
}

impl Step {
    /// Snake-case step name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppendMessage => "append_message",
            Self::StartRun => "start_run",
            Self::PollRun => "poll_run",
            Self::ListMessages => "list_messages",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an orchestration did not produce messages.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    /// A remote call failed. Earlier side effects are not rolled back.
    #[error("{step} failed: {source}")]
    Remote {
        /// Failing step.
        step: Step,
        /// Remote failure, verbatim.
        #[source]
        source: RemoteError,
    },

    /// Polling stopped on a status other than `completed`.
    #[error("run {run_id} finished with status {status}")]
    RunNotCompleted {
        /// Run ID.
        run_id: RunId,
        /// Last fetched status.
        status: RunStatus,
        /// Failure detail reported by the remote service.
        last_error: Option<RunLastError>,
    },

    /// The run was still running when the poll budget ran out.
    #[error("run {run_id} still running after {polls} polls ({}ms)", elapsed.as_millis())]
    PollTimeout {
        /// Run ID.
        run_id: RunId,
        /// Status fetches performed.
        polls: u32,
        /// Time spent polling.
        elapsed: Duration,
    },

    /// The cancellation token fired.
    #[error("orchestration cancelled")]
    Cancelled,
}

impl OrchestrationError {
    pub(crate) fn remote(step: Step, source: RemoteError) -> Self {
        Self::Remote { step, source }
    }

    /// HTTP status the boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Remote { source, .. } => source.status_code(),
            Self::RunNotCompleted { .. } => BAD_GATEWAY,
            Self::PollTimeout { .. } => 504,
            Self::Cancelled => 503,
        }
    }

    /// Failing step, for remote errors.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Remote { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Category string for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Remote { source, .. } => source.error_kind(),
            Self::RunNotCompleted { .. } => "run_not_completed",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::Cancelled => "cancelled",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
