//! Mock responses and the policy deciding when to use them.

use std::time::Duration;

/// Simulated network latency for mock responses.
pub const MOCK_LATENCY: Duration = Duration::from_millis(500);

/// Drop-in substitute for a live dispatch: waits [`MOCK_LATENCY`] and
/// returns `value` unchanged. Never fails.
pub async fn mock_dispatch<T>(endpoint: &str, value: T) -> T {
    log::warn!("Using mock data for: {}", endpoint);
    tokio::time::sleep(MOCK_LATENCY).await;
    value
}

/// Whether to serve mock data.
///
/// True when `override_flag` is exactly `"true"`, or when a host context
/// exists and its name does not contain `localhost`.
pub fn should_use_mock(override_flag: Option<&str>, host: Option<&str>) -> bool {
    override_flag == Some("true") || host.is_some_and(|h| !h.contains("localhost"))
}

/// Source of the current host name. Consulted on every policy check.
pub trait HostContext: Send + Sync {
    /// `None` when no host context exists.
    fn host_name(&self) -> Option<String>;
}

/// No host context at all (headless runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl HostContext for NoHost {
    fn host_name(&self) -> Option<String> {
        None
    }
}

/// Fixed host name.
#[derive(Debug, Clone)]
pub struct StaticHost(pub String);

impl HostContext for StaticHost {
    fn host_name(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Host name read from an environment variable at check time.
#[derive(Debug, Clone)]
pub struct EnvHost {
    var: String,
}

impl EnvHost {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl HostContext for EnvHost {
    fn host_name(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|h| !h.is_empty())
    }
}

/// Mock-use policy: the override flag captured at start-up combined with a
/// host context read fresh on every call.
pub struct MockPolicy {
    override_flag: Option<String>,
    host: Box<dyn HostContext>,
}

impl MockPolicy {
    pub fn new(override_flag: Option<String>, host: impl HostContext + 'static) -> Self {
        Self {
            override_flag,
            host: Box::new(host),
        }
    }

    /// Policy that never mocks unless forced.
    pub fn live() -> Self {
        Self::new(None, NoHost)
    }

    /// Policy that always mocks.
    pub fn forced() -> Self {
        Self::new(Some("true".to_string()), NoHost)
    }

    pub fn should_use_mock(&self) -> bool {
        let host = self.host.host_name();
        should_use_mock(self.override_flag.as_deref(), host.as_deref())
    }

    /// Current host name from the policy's host context.
    pub fn host_name(&self) -> Option<String> {
        self.host.host_name()
    }
}

impl std::fmt::Debug for MockPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPolicy")
            .field("override_flag", &self.override_flag)
            .field("host", &self.host.host_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    #[test]
    fn test_override_true_wins_for_any_host() {
        assert!(should_use_mock(Some("true"), None));
        assert!(should_use_mock(Some("true"), Some("localhost")));
        assert!(should_use_mock(Some("true"), Some("blog.example.com")));
    }

    #[test]
    fn test_non_localhost_host_mocks() {
        assert!(should_use_mock(None, Some("blog.example.com")));
        assert!(should_use_mock(Some("false"), Some("preview.vercel.app")));
    }

    #[test]
    fn test_localhost_does_not_mock() {
        assert!(!should_use_mock(None, Some("localhost")));
        assert!(!should_use_mock(None, Some("app.localhost")));
        assert!(!should_use_mock(Some("false"), Some("localhost")));
    }

    #[test]
    fn test_no_host_context_does_not_mock() {
        assert!(!should_use_mock(None, None));
        assert!(!should_use_mock(Some("TRUE"), None));
        assert!(!should_use_mock(Some("1"), None));
    }

    /// Counts how often the host is consulted.
    struct CountingHost {
        calls: Arc<AtomicU32>,
    }

    impl HostContext for CountingHost {
        fn host_name(&self) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some("localhost".to_string())
        }
    }

    #[test]
    fn test_policy_reads_host_every_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = MockPolicy::new(
            None,
            CountingHost {
                calls: calls.clone(),
            },
        );
        assert!(!policy.should_use_mock());
        assert!(!policy.should_use_mock());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_policy_presets() {
        assert!(MockPolicy::forced().should_use_mock());
        assert!(!MockPolicy::live().should_use_mock());
        assert!(MockPolicy::new(None, StaticHost("example.org".into())).should_use_mock());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_dispatch_returns_value_after_latency() {
        let start = tokio::time::Instant::now();
        let value = mock_dispatch("/x", json!({"a": 1})).await;
        assert_eq!(value, json!({"a": 1}));
        assert!(start.elapsed() >= MOCK_LATENCY);
        assert!(start.elapsed() < MOCK_LATENCY + Duration::from_millis(50));
    }
}
