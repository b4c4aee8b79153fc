//! Mapping of failures to HTTP responses.
//!
//! | Failure | Status | Body |
//! |---|---|---|
//! | remote non-2xx | remote status | raw remote body |
//! | transport / decode | 502 | `{"error"}` |
//! | run finished unsuccessfully | 502 | `{"error", "runId", "status", "lastError"}` |
//! | poll budget exhausted | 504 | `{"error", "runId", "polls"}` |
//! | cancelled (shutdown) | 503 | `{"error"}` |
//! | invalid request | 400 | `{"error"}` |

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::warn;

use threadrun_core::RemoteError;
use threadrun_runtime::OrchestrationError;

/// Handler error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A single remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The orchestrated workflow failed.
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),

    /// The inbound request is unusable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Remote(err) | Self::Orchestration(OrchestrationError::Remote { source: err, .. }) => {
                remote_response(err)
            }
            Self::Orchestration(err) => {
                let status = status_from(err.status_code());
                warn!(category = err.category(), error = %err, "orchestration failed");
                let body = match &err {
                    OrchestrationError::RunNotCompleted {
                        run_id,
                        status: run_status,
                        last_error,
                    } => json!({
                        "error": err.to_string(),
                        "runId": run_id,
                        "status": run_status,
                        "lastError": last_error,
                    }),
                    OrchestrationError::PollTimeout { run_id, polls, .. } => json!({
                        "error": err.to_string(),
                        "runId": run_id,
                        "polls": polls,
                    }),
                    OrchestrationError::Cancelled | OrchestrationError::Remote { .. } => {
                        json!({ "error": err.to_string() })
                    }
                };
                (status, Json(body)).into_response()
            }
            Self::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

/// Remote rejections keep status and body; everything else is a 502.
fn remote_response(err: RemoteError) -> Response {
    let status = status_from(err.status_code());
    match err {
        RemoteError::Status { body, .. } => {
            let content_type = if serde_json::from_str::<serde::de::IgnoredAny>(&body).is_ok() {
                "application/json"
            } else {
                "text/plain; charset=utf-8"
            };
            (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
                body,
            )
                .into_response()
        }
        RemoteError::Transport { .. } | RemoteError::Decode { .. } => {
            warn!(kind = err.error_kind(), error = %err, "remote call failed");
            (status, Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
