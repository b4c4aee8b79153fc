//! Outcome of a failed exchange with the remote service.
//!
//! The client never interprets remote error payloads: a non-2xx response is
//! carried as-is (status code + raw body) so the boundary can hand it back to
//! the caller unchanged.

/// Status code reported for failures that never produced a remote status
/// (connection errors, undecodable bodies).
pub const BAD_GATEWAY: u16 = 502;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Tagged failure of a single remote call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The remote service answered with a non-2xx status.
    #[error("remote returned status {status}: {body}")]
    Status {
        /// HTTP status code, verbatim.
        status: u16,
        /// Raw response body, verbatim.
        body: String,
    },

    /// The request never completed (connect, TLS, timeout, body read).
    #[error("transport error: {message}")]
    Transport {
        /// Error description.
        message: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("failed to decode remote response: {message}")]
    Decode {
        /// Error description.
        message: String,
    },
}

impl RemoteError {
    /// Build a [`RemoteError::Status`] from a response status and body.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Build a [`RemoteError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a [`RemoteError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status to report to the caller.
    ///
    /// Remote rejections keep their own status; everything else is a 502.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            Self::Transport { .. } | Self::Decode { .. } => BAD_GATEWAY,
        }
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "remote_rejection",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
