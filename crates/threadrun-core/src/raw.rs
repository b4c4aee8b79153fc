//! Remote response bodies kept as the exact text received.
//!
//! Passthrough endpoints hand the remote body back to the caller. Parsing it
//! into a `serde_json::Value` and serializing again reorders object keys and
//! rounds long numbers, so the body is only checked for well-formedness and
//! otherwise left alone.

use std::fmt;

use serde::de::IgnoredAny;

/// A body that is well-formed JSON, stored byte for byte.
#[derive(Clone, PartialEq, Eq)]
pub struct RawJson(String);

impl RawJson {
    /// Accept `body` if it is one complete JSON document.
    pub fn parse(body: String) -> Result<Self, serde_json::Error> {
        let _: IgnoredAny = serde_json::from_str(&body)?;
        Ok(Self(body))
    }

    /// The body text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the body text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the body is empty. Never true for a parsed value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RawJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawJson").field(&self.0).finish()
    }
}

impl fmt::Display for RawJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RawJson {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
