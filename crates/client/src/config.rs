//! Client configuration, read from the environment.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the inventory API lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    /// Optional bearer token.
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_token(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(token.into()),
            ..Self::new(api_url)
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read `PANTRY_API_URL`, `PANTRY_AUTH_TOKEN` and `PANTRY_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("PANTRY_API_URL").unwrap_or_else(|| {
            tracing::info!("PANTRY_API_URL not set; using {}", DEFAULT_API_URL);
            DEFAULT_API_URL.to_string()
        });

        let mut config = match lookup("PANTRY_AUTH_TOKEN").filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!("Initializing client with authentication token");
                Self::with_token(api_url, token)
            }
            None => {
                tracing::info!("Initializing client without authentication token");
                Self::new(api_url)
            }
        };

        if let Some(raw) = lookup("PANTRY_HTTP_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %raw,
                    "invalid PANTRY_HTTP_TIMEOUT_SECS; using {}s",
                    DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.auth_token, None);
    }

    #[test]
    fn reads_url_token_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PANTRY_API_URL", "https://pantry.example.com/"),
            ("PANTRY_AUTH_TOKEN", "secret"),
            ("PANTRY_HTTP_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(config.api_url, "https://pantry.example.com");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let config = ClientConfig::from_lookup(lookup(&[("PANTRY_HTTP_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let config = ClientConfig::from_lookup(lookup(&[("PANTRY_HTTP_TIMEOUT_SECS", "0")]));
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
