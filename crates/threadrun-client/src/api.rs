//! The remote operations the run orchestrator depends on.

use async_trait::async_trait;
use threadrun_core::{
    AssistantId, MessageList, RemoteResult, Role, Run, RunId, ThreadId, ThreadMessage,
};

/// Thread/run operations against the remote service.
///
/// Implementations perform exactly one remote exchange per call and never
/// retry. A non-2xx answer surfaces as [`threadrun_core::RemoteError::Status`]
/// with the body untouched.
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// Append a message to a thread.
    async fn append_message(
        &self,
        thread_id: &ThreadId,
        role: Role,
        content: &str,
    ) -> RemoteResult<ThreadMessage>;

    /// Start a run of `assistant_id` against a thread.
    async fn start_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &AssistantId,
        instructions: Option<&str>,
    ) -> RemoteResult<Run>;

    /// Fetch the current state of a run.
    async fn get_run(&self, thread_id: &ThreadId, run_id: &RunId) -> RemoteResult<Run>;

    /// List a thread's messages in remote order.
    async fn list_messages(&self, thread_id: &ThreadId) -> RemoteResult<MessageList>;
}
