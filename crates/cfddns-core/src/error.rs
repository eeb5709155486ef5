//! Error types for the cfddns system
//!
//! This module defines all error types used throughout the crate, along
//! with the fatal/transient classification the poll driver acts on.

use thiserror::Error;

/// Result type alias for cfddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// How the poll driver should react to an error.
///
/// Classification lives here, next to the error type, so that leaf code
/// never decides process fate on its own: it returns a typed error, and
/// the driver reads the severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Unrecoverable without human intervention; the process should exit.
    Fatal,
    /// Expected to clear on its own; skip the cycle and retry next interval.
    Transient,
}

/// Core error type for the cfddns system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing file, malformed document, bad values)
    #[error("configuration error: {0}")]
    Config(String),

    /// IP resolver errors (request failed, empty body)
    #[error("IP resolver error: {0}")]
    IpResolver(String),

    /// No zone matched the configured domain
    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    /// More than one zone matched the configured domain
    #[error("ambiguous zone match for {zone_name}: {found} zones returned")]
    AmbiguousZone {
        /// The zone name that was looked up
        zone_name: String,
        /// How many zones the provider returned
        found: usize,
    },

    /// Provider API error, naming the failing operation and target
    #[error("provider error ({provider}/{operation}) for {fqdn}: {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// The API operation that failed (e.g. "dns_records.put")
        operation: String,
        /// The FQDN or zone the call targeted
        fqdn: String,
        /// Error message
        message: String,
        /// Whether the failure is expected to clear on retry (5xx, network)
        transient: bool,
    },

    /// Authentication errors
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("rate limited: {0}")]
    RateLimited(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP resolver error
    pub fn ip_resolver(msg: impl Into<String>) -> Self {
        Self::IpResolver(msg.into())
    }

    /// Create a "zone not found" error
    pub fn zone_not_found(zone_name: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone_name.into())
    }

    /// Create an "ambiguous zone" error
    pub fn ambiguous_zone(zone_name: impl Into<String>, found: usize) -> Self {
        Self::AmbiguousZone {
            zone_name: zone_name.into(),
            found,
        }
    }

    /// Create a provider error for a failed API operation
    pub fn provider(
        provider: impl Into<String>,
        operation: impl Into<String>,
        fqdn: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            operation: operation.into(),
            fqdn: fqdn.into(),
            message: message.into(),
            transient: false,
        }
    }

    /// Create a provider error expected to clear on retry (5xx, network)
    pub fn provider_transient(
        provider: impl Into<String>,
        operation: impl Into<String>,
        fqdn: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            operation: operation.into(),
            fqdn: fqdn.into(),
            message: message.into(),
            transient: true,
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Classify this error for the poll driver.
    ///
    /// Misconfiguration (bad config, missing or ambiguous zone, rejected
    /// credentials) cannot be fixed by waiting. Network-level failures and
    /// provider-side throttling or outages can.
    pub fn severity(&self) -> Severity {
        match self {
            Error::Config(_) => Severity::Fatal,
            Error::ZoneNotFound(_) => Severity::Fatal,
            Error::AmbiguousZone { .. } => Severity::Fatal,
            Error::Authentication(_) => Severity::Fatal,
            Error::IpResolver(_) => Severity::Transient,
            Error::RateLimited(_) => Severity::Transient,
            Error::Provider { transient, .. } => {
                if *transient {
                    Severity::Transient
                } else {
                    Severity::Fatal
                }
            }
        }
    }

    /// Whether the driver should terminate on this error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
