//! Test doubles and common utilities for the core contract tests
//!
//! These doubles are deliberately small: a scripted resolver and an
//! in-memory provider with call counters, enough to observe exactly which
//! API calls the core logic makes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cfddns_core::config::ReconcileConfig;
use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{
    DnsProvider, DnsRecord, IpResolver, RecordSpec, RecordType, ResolvedIp, Zone,
};

/// Outcome of one scripted resolve: an address or an error message
pub type ScriptEntry = std::result::Result<String, String>;

/// An IpResolver that replays a scripted sequence of results.
///
/// Once the script is exhausted, the last entry repeats. Cloning shares
/// the script and counters, so tests keep a handle while the driver owns
/// its copy.
#[derive(Clone)]
pub struct ScriptedIpResolver {
    script: Arc<Mutex<VecDeque<ScriptEntry>>>,
    last: Arc<Mutex<Option<ScriptEntry>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedIpResolver {
    /// Create a resolver from a full script of successes and failures
    pub fn new(script: Vec<ScriptEntry>) -> Self {
        assert!(!script.is_empty(), "script must not be empty");
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a resolver that yields the given addresses in order
    pub fn addresses(addresses: &[&str]) -> Self {
        Self::new(addresses.iter().map(|a| Ok(a.to_string())).collect())
    }

    /// Number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpResolver for ScriptedIpResolver {
    async fn resolve(&self) -> Result<ResolvedIp> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let entry = {
            let mut script = self.script.lock().unwrap();
            match script.pop_front() {
                Some(entry) => {
                    *self.last.lock().unwrap() = Some(entry.clone());
                    entry
                }
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .expect("script has at least one entry"),
            }
        };

        match entry {
            Ok(address) => Ok(ResolvedIp::new(address)),
            Err(message) => Err(Error::ip_resolver(message)),
        }
    }
}

/// An in-memory DnsProvider with per-operation call counters.
///
/// Cloning shares all state, so tests keep a handle while the driver owns
/// its copy.
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    zones: Arc<Mutex<Vec<Zone>>>,
    records: Arc<Mutex<Vec<DnsRecord>>>,
    next_id: Arc<AtomicUsize>,
    /// When set, list_records ignores the type filter (simulates a
    /// provider whose filter semantics changed)
    relaxed_type_filter: Arc<AtomicBool>,
    /// When set, every call fails with an authentication error
    auth_failure: Arc<AtomicBool>,
    list_zones_calls: Arc<AtomicUsize>,
    list_records_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<(String, RecordSpec)>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone
    pub fn add_zone(&self, id: &str, name: &str) {
        self.zones.lock().unwrap().push(Zone {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    /// Seed an existing record
    pub fn seed_record(
        &self,
        id: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
        proxied: bool,
    ) {
        self.records.lock().unwrap().push(DnsRecord {
            id: id.to_string(),
            name: name.to_string(),
            record_type,
            content: content.to_string(),
            proxied,
        });
    }

    /// Flip the proxy flag of a stored record (as a dashboard user would)
    pub fn set_proxied(&self, record_id: &str, proxied: bool) {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .expect("record exists");
        record.proxied = proxied;
    }

    /// Make list_records return records of every type
    pub fn relax_type_filter(&self) {
        self.relaxed_type_filter.store(true, Ordering::SeqCst);
    }

    /// Make every call fail with an authentication error
    pub fn fail_auth(&self) {
        self.auth_failure.store(true, Ordering::SeqCst);
    }

    /// Snapshot of all stored records
    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Update calls seen so far, as (record_id, spec) pairs
    pub fn updates(&self) -> Vec<(String, RecordSpec)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn list_zones_calls(&self) -> usize {
        self.list_zones_calls.load(Ordering::SeqCst)
    }

    pub fn list_records_calls(&self) -> usize {
        self.list_records_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Total provider calls of any kind
    pub fn total_calls(&self) -> usize {
        self.list_zones_calls()
            + self.list_records_calls()
            + self.create_calls()
            + self.update_calls()
    }

    fn check_auth(&self, operation: &str) -> Result<()> {
        if self.auth_failure.load(Ordering::SeqCst) {
            return Err(Error::auth(format!("mock rejected {}", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth("zones.get")?;

        Ok(self
            .zones
            .lock()
            .unwrap()
            .iter()
            .filter(|z| z.name == name)
            .cloned()
            .collect())
    }

    async fn list_records(
        &self,
        _zone_id: &str,
        fqdn: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>> {
        self.list_records_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth("dns_records.get")?;

        let relaxed = self.relaxed_type_filter.load(Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == fqdn && (relaxed || r.record_type == record_type))
            .cloned()
            .collect())
    }

    async fn create_record(&self, _zone_id: &str, spec: &RecordSpec) -> Result<DnsRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth("dns_records.post")?;

        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = DnsRecord {
            id,
            name: spec.name.clone(),
            record_type: spec.record_type,
            content: spec.content.clone(),
            proxied: spec.proxied.unwrap_or(false),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        _zone_id: &str,
        record_id: &str,
        spec: &RecordSpec,
    ) -> Result<DnsRecord> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth("dns_records.put")?;

        self.updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), spec.clone()));

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| {
                Error::provider("mock", "dns_records.put", spec.name.as_str(), "no such record")
            })?;

        record.record_type = spec.record_type;
        record.content = spec.content.clone();
        if let Some(proxied) = spec.proxied {
            record.proxied = proxied;
        }
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Minimal config for driver tests: one-second interval
pub fn test_config(domain: &str) -> ReconcileConfig {
    ReconcileConfig::new(domain, "test-token", 1)
}
