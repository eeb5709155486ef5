//! Zone lookup and record reconciliation
//!
//! This is the decision core of cfddns: given a desired address, work out
//! whether the provider's record needs no action, an update, or creation,
//! and apply the minimal change.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::traits::{DnsProvider, RecordSpec, ResolvedIp, Zone};

/// The minimal action reconciliation applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A matching record already held the desired address
    Unchanged,
    /// An existing record was overwritten with the desired address
    Updated,
    /// No record existed; one was created
    Created,
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReconcileOutcome::Unchanged => "unchanged",
            ReconcileOutcome::Updated => "updated",
            ReconcileOutcome::Created => "created",
        };
        f.write_str(s)
    }
}

/// Resolve a zone name to the provider's zone identifier.
///
/// The name filter is exact, so anything other than a single match is a
/// configuration problem: zero zones means the domain isn't hosted on this
/// account, more than one means the account state is ambiguous. Both are
/// unrecoverable without human intervention.
pub async fn locate_zone(provider: &dyn DnsProvider, zone_name: &str) -> Result<Zone> {
    let mut zones = provider.list_zones(zone_name).await?;

    match zones.len() {
        0 => Err(crate::Error::zone_not_found(zone_name)),
        1 => {
            let zone = zones.swap_remove(0);
            debug!(zone = %zone.name, zone_id = %zone.id, "zone located");
            Ok(zone)
        }
        n => Err(crate::Error::ambiguous_zone(zone_name, n)),
    }
}

/// Reconcile the record for `fqdn` in `zone_id` against a desired address.
///
/// Fetches existing records matching the name and the desired address
/// type, then walks them in fetch order:
///
/// - a record of the wrong type is skipped (unreachable under the
///   server-side type filter, kept in case the filter is ever relaxed);
/// - a record already holding the desired address counts as touched and
///   scanning continues, so every sibling is still processed;
/// - any other record is overwritten in place, preserving its proxy flag.
///
/// Only when no record was touched at all is a new one created, with the
/// proxy flag left to the provider's default. When several records match,
/// each is handled individually and the last one processed determines the
/// returned outcome.
pub async fn reconcile(
    provider: &dyn DnsProvider,
    zone_id: &str,
    fqdn: &str,
    desired: &ResolvedIp,
) -> Result<ReconcileOutcome> {
    let record_type = desired.record_type();
    let records = provider.list_records(zone_id, fqdn, record_type).await?;

    let mut outcome: Option<ReconcileOutcome> = None;

    for record in &records {
        if record.record_type != record_type {
            warn!(
                fqdn,
                found = %record.record_type,
                wanted = %record_type,
                "ignoring record with wrong address family"
            );
            continue;
        }

        if record.content == desired.address {
            info!(fqdn, address = %desired.address, "record unchanged");
            outcome = Some(ReconcileOutcome::Unchanged);
            continue;
        }

        let spec = RecordSpec {
            name: fqdn.to_string(),
            record_type,
            content: desired.address.clone(),
            proxied: Some(record.proxied),
        };
        provider.update_record(zone_id, &record.id, &spec).await?;
        info!(
            fqdn,
            from = %record.content,
            to = %desired.address,
            "record updated"
        );
        outcome = Some(ReconcileOutcome::Updated);
    }

    if let Some(outcome) = outcome {
        return Ok(outcome);
    }

    // No existing record of this name and type: create one
    let spec = RecordSpec {
        name: fqdn.to_string(),
        record_type,
        content: desired.address.clone(),
        proxied: None,
    };
    provider.create_record(zone_id, &spec).await?;
    info!(fqdn, address = %desired.address, "record created");
    Ok(ReconcileOutcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(ReconcileOutcome::Unchanged.to_string(), "unchanged");
        assert_eq!(ReconcileOutcome::Updated.to_string(), "updated");
        assert_eq!(ReconcileOutcome::Created.to_string(), "created");
    }
}
