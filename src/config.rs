//! Process configuration read once at start-up.
//!
//! Lookup order for each value: the `BLOG_*` variable, then the front-end
//! `NEXT_PUBLIC_*` variable, then the default.

use std::time::Duration;

use crate::api::mock::{EnvHost, MockPolicy};

/// Default backend address for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Variable holding the host name the app is served from.
pub const APP_HOST_VAR: &str = "BLOG_APP_HOST";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL with no trailing slash.
    pub base_url: String,
    /// Raw mock override value (`"true"` forces mock data).
    pub mock_override: Option<String>,
    /// Deadline applied to requests that don't set their own.
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            mock_override: None,
            timeout: None,
        }
    }
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty("BLOG_API_URL")
            .or_else(|| non_empty("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let mock_override =
            non_empty("BLOG_USE_MOCK_API").or_else(|| non_empty("NEXT_PUBLIC_USE_MOCK_API"));

        let timeout =
            non_empty("BLOG_API_TIMEOUT_SECS").and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    log::warn!("Ignoring invalid BLOG_API_TIMEOUT_SECS value: {}", raw);
                    None
                }
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            mock_override,
            timeout,
        }
    }

    /// Mock policy using this override and the `BLOG_APP_HOST` host context.
    pub fn mock_policy(&self) -> MockPolicy {
        MockPolicy::new(self.mock_override.clone(), EnvHost::new(APP_HOST_VAR))
    }
}
