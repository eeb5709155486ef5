//! Configuration types for the cfddns system

use std::time::Duration;

/// Resolved configuration for one synchronized domain.
///
/// Immutable for the process lifetime; loaded once, before the poll loop
/// starts, by a [`crate::traits::ConfigProvider`].
#[derive(Clone)]
pub struct ReconcileConfig {
    /// The fully-qualified name to keep in sync (e.g. "home.example.com")
    pub domain: String,

    /// Provider API token
    /// ⚠️ NEVER log this value
    pub token: String,

    /// Seconds to sleep between poll cycles
    pub poll_interval_secs: u64,
}

impl ReconcileConfig {
    /// Create a new configuration
    pub fn new(
        domain: impl Into<String>,
        token: impl Into<String>,
        poll_interval_secs: u64,
    ) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            poll_interval_secs,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("domain cannot be empty"));
        }
        if self.token.is_empty() {
            return Err(crate::Error::config("provider token cannot be empty"));
        }
        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("poll interval must be > 0"));
        }
        Ok(())
    }

    /// The configured poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ReconcileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconcileConfig")
            .field("domain", &self.domain)
            .field("token", &"<REDACTED>")
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}
