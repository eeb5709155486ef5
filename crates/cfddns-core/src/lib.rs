// # cfddns-core
//
// Core library for the cfddns dynamic-DNS synchronizer.
//
// ## Architecture Overview
//
// This library provides the reconciliation core for keeping a single
// domain's A/AAAA record in sync with the host's public IP:
// - **IpResolver**: Trait for resolving the current public IP
// - **DnsProvider**: Trait for the provider's zone/record API
// - **ConfigProvider**: Trait for resolving a domain into a ReconcileConfig
// - **locate_zone / reconcile**: Zone lookup and the create/update/no-op
//   decision logic
// - **PollDriver**: The fixed-interval loop that ties the above together
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Typed Errors**: Leaf functions return classified errors; the driver
//    decides what is fatal and what is retried on the next interval
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Idempotency**: Reconciling the same address twice is a no-op

pub mod traits;
pub mod engine;
pub mod config;
pub mod domain;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpResolver, DnsProvider, ConfigProvider};
pub use traits::{AddressFamily, ResolvedIp, RecordType, Zone, DnsRecord, RecordSpec};
pub use engine::{PollDriver, DomainContext, DriverEvent};
pub use engine::reconcile::{locate_zone, reconcile, ReconcileOutcome};
pub use config::ReconcileConfig;
pub use error::{Error, Result, Severity};
