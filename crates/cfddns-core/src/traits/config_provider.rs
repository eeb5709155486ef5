// # Config Provider Trait
//
// Defines the interface for resolving a domain name into a
// [`ReconcileConfig`].
//
// Config-file location by convention and the document format are
// environment-coupled concerns that live in the daemon; the core only
// requires something that can produce a validated configuration, so the
// reconciliation logic stays testable with an in-memory configuration.

use crate::config::ReconcileConfig;

/// Trait for configuration provider implementations
///
/// Called exactly once per process, before the poll loop starts.
pub trait ConfigProvider: Send + Sync {
    /// Resolve the configuration for a domain
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileConfig)`: A validated configuration
    /// - `Err(Error)`: If no configuration exists for the domain or the
    ///   document is malformed
    fn load(&self, domain: &str) -> Result<ReconcileConfig, crate::Error>;
}
