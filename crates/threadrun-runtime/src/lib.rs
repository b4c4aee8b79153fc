//! # threadrun-runtime
//!
//! The run orchestration workflow: append the caller's message to a thread,
//! start a run, poll it until it leaves the running states, then collect the
//! thread's messages.
//!
//! - [`RunOrchestrator`]: executes the workflow against any [`threadrun_client::ConversationApi`]
//! - [`PollPolicy`]: interval, deadline and optional poll cap
//! - [`OrchestrationError`]: which step failed and why
//!
//! Every orchestration takes a [`tokio_util::sync::CancellationToken`]; each
//! remote call and each wait races against it.

#![deny(unsafe_code)]

pub mod errors;
pub mod orchestrator;
pub mod policy;

pub use errors::{OrchestrationError, Step};
pub use orchestrator::{OrchestrationResult, RunOrchestrator, RunOutcome, RunRequest};
pub use policy::PollPolicy;
