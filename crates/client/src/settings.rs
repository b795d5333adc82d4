//! Connection settings, read from the environment.

use core::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Backend origin used when `BILLGEN_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Origin of the bill service, without the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientSettings {
    /// `BILLGEN_API_URL`, `BILLGEN_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("BILLGEN_API_URL").unwrap_or(defaults.base_url);
        let timeout = env_or("BILLGEN_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs());

        Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or unparsable (the latter is logged).
pub fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, ?default, "invalid value in environment; using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url, "http://localhost:4000");
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builders_override() {
        let settings = ClientSettings::default()
            .with_base_url("http://backend:4000")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(settings.base_url, "http://backend:4000");
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: u64 = env_or("BILLGEN_TEST_SURELY_UNSET_VARIABLE", 7);
        assert_eq!(value, 7);
    }
}
