use std::time::Duration;

use crate::shared::constants::{BACKEND_URL_ENV, DEFAULT_BACKEND_URL};

/// Where the face detection backend lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendConfig {
    base_url: String,
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Reads the base URL from `FACELENS_BACKEND_URL`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an endpoint path (with leading slash) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8000", "http://localhost:8000/detect-faces")]
    #[case("http://localhost:8000/", "http://localhost:8000/detect-faces")]
    #[case("  https://faces.example.com/api// ", "https://faces.example.com/api/detect-faces")]
    fn test_endpoint_joins_without_double_slash(#[case] base: &str, #[case] expected: &str) {
        let config = BackendConfig::new(base);
        assert_eq!(config.endpoint("/detect-faces"), expected);
    }

    #[test]
    fn test_default_points_at_localhost() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_with_timeout() {
        let config = BackendConfig::default().with_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
