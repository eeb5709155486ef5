// # IP Resolver Trait
//
// Defines the interface for resolving the caller's current public IP.
//
// ## Implementations
//
// - HTTP echo endpoint: `cfddns-ip-echo` crate
// - Future: router UPnP query, interface inspection
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::IpResolver;
//
// #[tokio::main]
// async fn main() -> cfddns_core::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     let resolved = resolver.resolve().await?;
//     println!("{} ({:?})", resolved.address, resolved.family);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use super::dns_provider::RecordType;

/// Address family of a resolved IP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Classify an address string by the colon rule: anything containing a
    /// colon is IPv6, everything else IPv4. No further validation is done;
    /// the echo endpoint is trusted to return an address.
    pub fn classify(address: &str) -> Self {
        if address.contains(':') {
            AddressFamily::V6
        } else {
            AddressFamily::V4
        }
    }

    /// The DNS record type this family maps to
    pub fn record_type(self) -> RecordType {
        match self {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::Aaaa,
        }
    }
}

/// A freshly resolved public IP address.
///
/// Produced once per poll cycle and never persisted across restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIp {
    /// The address text as returned by the resolver, trimmed
    pub address: String,
    /// Which family the address belongs to
    pub family: AddressFamily,
}

impl ResolvedIp {
    /// Build a resolved IP, classifying the family from the address text
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let family = AddressFamily::classify(&address);
        Self { address, family }
    }

    /// The record type a record for this address must have
    pub fn record_type(&self) -> RecordType {
        self.family.record_type()
    }
}

/// Trait for IP resolver implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// They perform a single lookup per call: no retry (the poll loop's next
/// interval is the retry), no caching, no background tasks.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(ResolvedIp)`: The current address and its family
    /// - `Err(Error)`: If the lookup failed or returned an empty body
    async fn resolve(&self) -> Result<ResolvedIp, crate::Error>;
}
