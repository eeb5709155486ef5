//! Core traits for the cfddns system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Resolve the current public IP address
//! - [`DnsProvider`]: Zone and record operations against the provider API
//! - [`ConfigProvider`]: Resolve a domain into a [`crate::ReconcileConfig`]

pub mod ip_resolver;
pub mod dns_provider;
pub mod config_provider;

pub use ip_resolver::{IpResolver, ResolvedIp, AddressFamily};
pub use dns_provider::{DnsProvider, RecordType, Zone, DnsRecord, RecordSpec};
pub use config_provider::ConfigProvider;
