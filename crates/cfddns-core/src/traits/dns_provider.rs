// # DNS Provider Trait
//
// Defines the interface for zone and record operations via provider APIs.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
// - Future: Route53, DigitalOcean, GoDaddy, etc.
//
// ## Trust Level
//
// Providers are thin API adapters with strict limitations:
//
// - ✅ Perform HTTP/HTTPS calls to their endpoints only
// - ✅ Parse provider-specific responses into the types below
// - ❌ No retry or backoff (the poll driver owns scheduling)
// - ❌ No caching of zones or records (the driver re-resolves per change)
// - ❌ No background tasks
// - ❌ No deciding whether an update is needed (owned by the reconciler)
//
// A provider error must be distinguishable from a network error: API-level
// rejections map to fatal `Error::Provider` / `Error::Authentication`,
// while connection failures and 5xx map to transient variants.

use async_trait::async_trait;

/// DNS record type managed by this system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// The provider wire name for this type
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// Parse a provider wire name ("A" / "AAAA")
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "A" => Some(RecordType::A),
            "AAAA" => Some(RecordType::Aaaa),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hosted zone as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Opaque provider identifier for the zone
    pub id: String,
    /// The zone name (registrable domain, e.g. "example.com")
    pub name: String,
}

/// A DNS record as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Opaque provider identifier for the record
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record type (A or AAAA)
    pub record_type: RecordType,
    /// The address the record currently points at
    pub content: String,
    /// Whether traffic to the record is proxied through the provider
    pub proxied: bool,
}

/// The write-side payload for record create/update calls.
///
/// `proxied` is `None` on create (the provider default applies, since there
/// is no existing flag to preserve) and `Some` of the preserved value on
/// update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    /// Fully-qualified record name
    pub name: String,
    /// Record type (A or AAAA)
    pub record_type: RecordType,
    /// The address to store
    pub content: String,
    /// Proxy flag to set, or `None` for the provider default
    pub proxied: Option<bool>,
}

/// Trait for DNS provider implementations
///
/// All filters are exact-match and applied server-side: `list_zones`
/// returns only zones with the given name, and `list_records` returns only
/// records matching both name and type.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List zones whose name exactly matches `name`
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>, crate::Error>;

    /// List records in a zone matching both `fqdn` and `record_type`
    async fn list_records(
        &self,
        zone_id: &str,
        fqdn: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a record in a zone
    ///
    /// # Returns
    ///
    /// The record as the provider stored it.
    async fn create_record(
        &self,
        zone_id: &str,
        spec: &RecordSpec,
    ) -> Result<DnsRecord, crate::Error>;

    /// Overwrite an existing record, keyed by its provider identifier
    ///
    /// # Returns
    ///
    /// The record as the provider stored it.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        spec: &RecordSpec,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_wire_names() {
        assert_eq!(RecordType::A.as_str(), "A");
        assert_eq!(RecordType::Aaaa.as_str(), "AAAA");
        assert_eq!(RecordType::from_wire("A"), Some(RecordType::A));
        assert_eq!(RecordType::from_wire("AAAA"), Some(RecordType::Aaaa));
        assert_eq!(RecordType::from_wire("TXT"), None);
    }
}
