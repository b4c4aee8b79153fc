//! # threadrun-server
//!
//! HTTP boundary: translates inbound JSON requests into remote client and
//! run orchestrator calls, and their outcomes into responses.
//!
//! - `POST /api/assistant/create-assistant`, `create-thread`, `add-message`:
//!   single remote calls, answered with the raw remote body
//! - `POST /api/assistant/create-run`: the orchestrated workflow
//! - `POST /api/mental-health/chat`: stateless chat completion
//! - `GET /health`: liveness plus in-flight run count
//!
//! Remote rejections are handed back with their original status and body.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{AppState, ThreadrunServer};
pub use shutdown::ShutdownCoordinator;
