//! Thread messages.
//!
//! A message is immutable once the remote service has created it. The typed
//! view here is what the runtime inspects; the raw listing body is kept
//! alongside so callers receive exactly what the remote service sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{AssistantId, MessageId, RunId, ThreadId};
use crate::raw::RawJson;

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user input.
    User,
    /// Model output.
    Assistant,
    /// System / developer instructions.
    System,
}

impl Role {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// Text payload of a content part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text itself.
    pub value: String,
    /// Citations and file references, passed through untouched.
    #[serde(default)]
    pub annotations: Vec<Value>,
}

/// One content part of a message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    /// Plain text.
    Text {
        /// Text payload.
        text: TextContent,
    },
    /// Images, file references and anything else we do not inspect.
    #[serde(other)]
    Other,
}

/// A message as stored on a remote thread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Remote-assigned message ID.
    pub id: MessageId,
    /// Thread the message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadId>,
    /// Author role.
    pub role: Role,
    /// Ordered content parts.
    #[serde(default)]
    pub content: Vec<MessageContent>,
    /// Assistant that produced the message, for assistant messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<AssistantId>,
    /// Run that produced the message, for assistant messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
    /// Creation time (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl ThreadMessage {
    /// Concatenate all text parts, separated by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of listing a thread's messages.
///
/// `raw` is the listing body exactly as received; `data` is the typed,
/// order-preserving view of its `data` array.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageList {
    /// Typed messages in the order the remote service returned them.
    pub data: Vec<ThreadMessage>,
    /// The untouched listing body.
    pub raw: RawJson,
}

#[derive(Deserialize)]
struct ListingBody {
    #[serde(default)]
    data: Vec<ThreadMessage>,
}

impl MessageList {
    /// Parse a listing body while keeping its original text.
    pub fn from_body(body: String) -> Result<Self, serde_json::Error> {
        Self::from_raw(RawJson::parse(body)?)
    }

    /// Typed view over an already-validated body.
    pub fn from_raw(raw: RawJson) -> Result<Self, serde_json::Error> {
        let listing: ListingBody = serde_json::from_str(raw.as_str())?;
        Ok(Self {
            data: listing.data,
            raw,
        })
    }

    /// Typed messages.
    pub fn messages(&self) -> &[ThreadMessage] {
        &self.data
    }

    /// Number of messages in the listing.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the listing has no messages.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the listing and return the raw body.
    pub fn into_raw(self) -> RawJson {
        self.raw
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
