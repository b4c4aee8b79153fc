//! Client construction errors.

/// Failure to build an [`crate::OpenAiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A configured value cannot be sent as an HTTP header.
    #[error("invalid header value for {name}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },

    /// The configured base URL cannot carry request paths.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_header_display_names_header_only() {
        let err = ClientError::InvalidHeader {
            name: "authorization",
        };
        assert_eq!(err.to_string(), "invalid header value for authorization");
    }

    #[test]
    fn invalid_base_url_display() {
        let err = ClientError::InvalidBaseUrl {
            url: "not a url".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid base URL not a url: relative URL without a base"
        );
    }
}
