//! The append → run → poll → collect workflow.
//!
//! Each orchestration is one sequential chain of remote calls; at most one
//! status request is in flight at a time. Any failure aborts the chain and is
//! returned tagged with its [`Step`]. Nothing is retried and nothing already
//! done on the remote side is rolled back.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use threadrun_client::ConversationApi;
use threadrun_core::{AssistantId, MessageList, Role, Run, RunId, RunStatus, ThreadId};

use crate::errors::{OrchestrationError, Step};
use crate::policy::PollPolicy;

/// Input of one orchestration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRequest {
    /// Thread to append to and run against.
    pub thread_id: ThreadId,
    /// Assistant that executes the run.
    pub assistant_id: AssistantId,
    /// Optional instruction override for this run.
    pub instructions: Option<String>,
    /// The caller's message.
    pub user_prompt: String,
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// Run ID.
    pub run_id: RunId,
    /// Status fetches performed.
    pub polls: u32,
    /// Final status (always `completed` on success).
    pub status: RunStatus,
    /// Time spent polling.
    pub elapsed: Duration,
}

/// Successful orchestration result.
#[derive(Clone, Debug, PartialEq)]
pub struct OrchestrationResult {
    /// The thread's messages, raw body included.
    pub messages: MessageList,
    /// Run summary.
    pub outcome: RunOutcome,
}

/// Executes run orchestrations against a [`ConversationApi`].
///
/// Cheap to clone; clones share the API handle and the in-flight counter.
#[derive(Clone)]
pub struct RunOrchestrator {
    api: Arc<dyn ConversationApi>,
    policy: PollPolicy,
    in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for RunOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOrchestrator")
            .field("policy", &self.policy)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl RunOrchestrator {
    /// Create an orchestrator.
    pub fn new(api: Arc<dyn ConversationApi>, policy: PollPolicy) -> Self {
        Self {
            api,
            policy,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Poll policy in use.
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Orchestrations currently executing.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Run the whole workflow.
    ///
    /// Dropping the returned future aborts the chain at its current await
    /// point, same as cancelling `cancel`.
    #[instrument(skip_all, fields(thread_id = %request.thread_id, assistant_id = %request.assistant_id))]
    pub async fn run(
        &self,
        request: &RunRequest,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationResult, OrchestrationError> {
        let _guard = InFlightGuard::enter(&self.in_flight);

        // 1. append
        let message = guarded(
            cancel,
            self.api
                .append_message(&request.thread_id, Role::User, &request.user_prompt),
        )
        .await?
        .map_err(|e| OrchestrationError::remote(Step::AppendMessage, e))?;
        debug!(message_id = %message.id, "user message appended");

        // 2. start
        let run = guarded(
            cancel,
            self.api.start_run(
                &request.thread_id,
                &request.assistant_id,
                request.instructions.as_deref(),
            ),
        )
        .await?
        .map_err(|e| OrchestrationError::remote(Step::StartRun, e))?;
        info!(run_id = %run.id, status = %run.status, "run started");

        // 3. poll
        let (run, outcome) = self.poll_until_finished(&request.thread_id, run.id, cancel).await?;

        if run.status.is_unsuccessful() {
            warn!(
                run_id = %run.id,
                status = %run.status,
                polls = outcome.polls,
                "run finished without completing"
            );
            return Err(OrchestrationError::RunNotCompleted {
                run_id: run.id,
                status: run.status,
                last_error: run.last_error,
            });
        }

        // 4. collect
        let messages = guarded(cancel, self.api.list_messages(&request.thread_id))
            .await?
            .map_err(|e| OrchestrationError::remote(Step::ListMessages, e))?;

        info!(
            run_id = %outcome.run_id,
            polls = outcome.polls,
            elapsed_ms = u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            messages = messages.len(),
            "run completed"
        );

        Ok(OrchestrationResult { messages, outcome })
    }

    /// Fetch run status once per interval until it leaves the running states.
    ///
    /// Always fetches at least once, and never again after a finished status.
    async fn poll_until_finished(
        &self,
        thread_id: &ThreadId,
        run_id: RunId,
        cancel: &CancellationToken,
    ) -> Result<(Run, RunOutcome), OrchestrationError> {
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            if !self.policy.allows_another(polls, started.elapsed()) {
                let elapsed = started.elapsed();
                warn!(run_id = %run_id, polls, elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX), "poll budget exhausted");
                return Err(OrchestrationError::PollTimeout {
                    run_id,
                    polls,
                    elapsed,
                });
            }

            guarded(cancel, tokio::time::sleep(self.policy.interval)).await?;

            let run = guarded(cancel, self.api.get_run(thread_id, &run_id))
                .await?
                .map_err(|e| OrchestrationError::remote(Step::PollRun, e))?;
            polls += 1;
            debug!(run_id = %run_id, poll = polls, status = %run.status, "run status fetched");

            if !run.status.is_running() {
                let outcome = RunOutcome {
                    run_id,
                    polls,
                    status: run.status.clone(),
                    elapsed: started.elapsed(),
                };
                return Ok((run, outcome));
            }
        }
    }
}

/// Race `fut` against `cancel`, preferring cancellation when both are ready.
async fn guarded<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, OrchestrationError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!("orchestration cancelled");
            Err(OrchestrationError::Cancelled)
        }
        out = fut => Ok(out),
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        let _ = counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let _ = self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
