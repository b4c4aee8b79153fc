//! Package-level constants.

/// Current version of threadrun (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "threadrun";

/// Default base URL of the remote provider API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Value of the `OpenAI-Beta` header required by the assistants endpoints.
pub const ASSISTANTS_BETA: &str = "assistants=v2";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "VERSION must be semver (MAJOR.MINOR.PATCH)");
        for part in parts {
            let _: u32 = part.parse().expect("each semver segment must be a number");
        }
    }

    #[test]
    fn name_is_lowercase() {
        assert_eq!(NAME, NAME.to_lowercase());
    }

    #[test]
    fn base_url_has_no_trailing_slash() {
        assert!(!DEFAULT_OPENAI_BASE_URL.ends_with('/'));
    }
}
