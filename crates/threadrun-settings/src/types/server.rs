//! Inbound HTTP server settings.

use serde::{Deserialize, Serialize};

/// Server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port (`0` picks a free port).
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            shutdown_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let s: ServerSettings = serde_json::from_str(r#"{"port": 9999}"#).unwrap();
        assert_eq!(s.port, 9999);
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.shutdown_timeout_secs, 30);
    }
}
