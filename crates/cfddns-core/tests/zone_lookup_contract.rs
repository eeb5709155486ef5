//! Contract test: zone lookup
//!
//! The zone name filter is exact, so anything other than one match is a
//! configuration error. Verifies:
//! - exactly one match returns the zone's id and name
//! - zero matches and multiple matches fail, fatally

mod common;

use common::*;
use cfddns_core::{Error, locate_zone};

#[tokio::test]
async fn sole_zone_is_returned() {
    let provider = MockDnsProvider::new();
    provider.add_zone("023e105f4ecef8ad9ca31a8372d0c353", "example.com");

    let zone = locate_zone(&provider, "example.com")
        .await
        .expect("single zone resolves");

    assert_eq!(zone.id, "023e105f4ecef8ad9ca31a8372d0c353");
    assert_eq!(zone.name, "example.com");
    assert_eq!(provider.list_zones_calls(), 1);
}

#[tokio::test]
async fn zero_matches_is_fatal() {
    let provider = MockDnsProvider::new();

    let err = locate_zone(&provider, "example.com").await.unwrap_err();

    assert!(matches!(err, Error::ZoneNotFound(_)));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("example.com"));
}

#[tokio::test]
async fn zone_with_other_name_does_not_match() {
    let provider = MockDnsProvider::new();
    provider.add_zone("zone-1", "other.net");

    let err = locate_zone(&provider, "example.com").await.unwrap_err();
    assert!(matches!(err, Error::ZoneNotFound(_)));
}

#[tokio::test]
async fn multiple_matches_is_fatal() {
    let provider = MockDnsProvider::new();
    provider.add_zone("zone-1", "example.com");
    provider.add_zone("zone-2", "example.com");

    let err = locate_zone(&provider, "example.com").await.unwrap_err();

    assert!(matches!(err, Error::AmbiguousZone { found: 2, .. }));
    assert!(err.is_fatal());
}
