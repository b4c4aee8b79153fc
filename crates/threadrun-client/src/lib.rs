//! # threadrun-client
//!
//! Authenticated transport to the remote conversation service.
//!
//! - [`ConversationApi`]: the four calls the run orchestrator needs, as a trait
//!   so tests can drive the orchestrator with a scripted fake
//! - [`OpenAiClient`]: the real implementation over one pooled `reqwest::Client`,
//!   plus the stateless passthroughs (assistant, thread, message, chat)
//! - [`chat`]: request/response types for the chat completions endpoint
//!
//! Every call is exactly one HTTP exchange. Nothing is retried.

#![deny(unsafe_code)]

pub mod api;
pub mod chat;
pub mod client;
pub mod errors;

pub use api::ConversationApi;
pub use chat::{ChatCompletion, ChatCompletionRequest, ChatMessage, Choice, Usage};
pub use client::{OpenAiClient, OpenAiClientConfig};
pub use errors::ClientError;
