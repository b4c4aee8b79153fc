//! # threadrun-core
//!
//! Shared vocabulary for the threadrun workspace:
//!
//! - **Branded IDs**: `ThreadId`, `RunId`, `AssistantId`, `MessageId` as newtypes
//!   around the opaque strings the remote service assigns
//! - **Messages**: [`ThreadMessage`] and the [`MessageList`] returned by a thread listing
//! - **Raw bodies**: [`RawJson`], remote JSON kept as the exact text received
//! - **Runs**: [`Run`] and the [`RunStatus`] lifecycle observed while polling
//! - **Assistants**: [`NewAssistant`] request payload and tool tags
//! - **Errors**: [`RemoteError`], the tagged outcome of a failed remote exchange
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber

#![deny(unsafe_code)]

pub mod assistant;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod messages;
pub mod raw;
pub mod run;

pub use assistant::{NewAssistant, ToolType};
pub use errors::{RemoteError, RemoteResult};
pub use ids::{AssistantId, MessageId, RunId, ThreadId};
pub use messages::{MessageContent, MessageList, Role, ThreadMessage};
pub use raw::RawJson;
pub use run::{Run, RunLastError, RunStatus};
