// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of the cfddns
// DnsProvider trait.
//
// ## Scope
//
// - One HTTP request per trait call, full error propagation to the driver
// - HTTP timeout configured (30 seconds)
// - Specific error mapping for HTTP status codes (401/403, 429, 5xx)
// - API-level failures (HTTP 200, success=false envelope) reported as
//   provider errors, distinct from network-level failures
// - Dry-run mode: reads execute, writes are logged and skipped
// - NO retry, backoff, or scheduling (owned by the poll driver)
// - NO caching of zones or records (the driver re-resolves per change)
// - NO background tasks
//
// ## Security Requirements
//
// - API token NEVER appears in logs
// - Provider MUST fail fast if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use std::time::Duration;

use async_trait::async_trait;
use cfddns_core::traits::{DnsProvider, DnsRecord, RecordSpec, RecordType, Zone};
use cfddns_core::{Error, Result};
use serde_json::Value;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider name used in logs and error messages
const PROVIDER_NAME: &str = "cloudflare";

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (zone lookup, record lookup)
/// - Log the intended POST/PUT payload
/// - **NOT** actually modify DNS records
///
/// This allows safe testing without making changes.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `dry_run`: If true, perform GET requests but skip writes
    ///
    /// # Panics
    ///
    /// Panics if the token is empty; an empty token is a programming error
    /// since configuration validation rejects it earlier.
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        let api_token = api_token.into();

        if api_token.is_empty() {
            panic!("Cloudflare API token cannot be empty");
        }

        Self {
            api_token,
            client,
            dry_run,
        }
    }

    /// Create a new Cloudflare provider (production/live mode)
    pub fn new_live(api_token: impl Into<String>) -> Self {
        Self::new(api_token, false)
    }

    /// Create a new Cloudflare provider (dry-run mode)
    pub fn new_dry_run(api_token: impl Into<String>) -> Self {
        Self::new(api_token, true)
    }

    /// Send a request and return the parsed response envelope.
    ///
    /// Network failures and 5xx map to transient errors; 401/403, 429 and
    /// other rejections map to their fatal counterparts. A 200 response
    /// whose envelope carries `success: false` is an API-level error.
    async fn send(
        &self,
        operation: &'static str,
        target: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value> {
        let response = request
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| {
                Error::provider_transient(
                    PROVIDER_NAME,
                    operation,
                    target,
                    format!("HTTP request failed: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(match status.as_u16() {
                401 | 403 => Error::auth(format!(
                    "invalid API token or insufficient permissions ({} for {}, status {})",
                    operation, target, status
                )),
                429 => Error::rate_limited(format!(
                    "{} for {}: status {}",
                    operation, target, status
                )),
                500..=599 => Error::provider_transient(
                    PROVIDER_NAME,
                    operation,
                    target,
                    format!("server error: {} - {}", status, error_text),
                ),
                _ => Error::provider(
                    PROVIDER_NAME,
                    operation,
                    target,
                    format!("{} - {}", status, error_text),
                ),
            });
        }

        let json: Value = response.json().await.map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                operation,
                target,
                format!("failed to parse response: {}", e),
            )
        })?;

        if !json["success"].as_bool().unwrap_or(false) {
            return Err(Error::provider(
                PROVIDER_NAME,
                operation,
                target,
                format!("API error: {}", json["errors"]),
            ));
        }

        Ok(json)
    }

    /// Extract a string field from a response object
    fn str_field<'a>(
        operation: &'static str,
        target: &str,
        value: &'a Value,
        name: &str,
    ) -> Result<&'a str> {
        value[name].as_str().ok_or_else(|| {
            Error::provider(
                PROVIDER_NAME,
                operation,
                target,
                format!("invalid response format: {} is not a string", name),
            )
        })
    }

    /// Parse one record object from a response
    fn parse_record(operation: &'static str, target: &str, value: &Value) -> Result<DnsRecord> {
        let field = |name| Self::str_field(operation, target, value, name);

        let type_str = field("type")?;
        let record_type = RecordType::from_wire(type_str).ok_or_else(|| {
            Error::provider(
                PROVIDER_NAME,
                operation,
                target,
                format!("unexpected record type in response: {}", type_str),
            )
        })?;

        Ok(DnsRecord {
            id: field("id")?.to_string(),
            name: field("name")?.to_string(),
            record_type,
            content: field("content")?.to_string(),
            proxied: value["proxied"].as_bool().unwrap_or(false),
        })
    }

    /// Build the JSON body for a record write.
    ///
    /// The proxy flag is only sent when the spec carries one; creates omit
    /// it so the provider default applies.
    fn write_payload(spec: &RecordSpec) -> Value {
        let mut payload = serde_json::json!({
            "name": spec.name,
            "type": spec.record_type.as_str(),
            "content": spec.content,
        });
        if let Some(proxied) = spec.proxied {
            payload["proxied"] = Value::Bool(proxied);
        }
        payload
    }

    /// Synthetic record returned by dry-run writes
    fn dry_run_record(spec: &RecordSpec) -> DnsRecord {
        DnsRecord {
            id: "dry-run".to_string(),
            name: spec.name.clone(),
            record_type: spec.record_type,
            content: spec.content.clone(),
            proxied: spec.proxied.unwrap_or(false),
        }
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>> {
        tracing::debug!(zone = name, "listing zones");

        let url = format!("{}/zones?name={}", CLOUDFLARE_API_BASE, name);
        let json = self.send("zones.get", name, self.client.get(&url)).await?;

        let zones = json["result"].as_array().ok_or_else(|| {
            Error::provider(
                PROVIDER_NAME,
                "zones.get",
                name,
                "invalid response format: result is not an array",
            )
        })?;

        zones
            .iter()
            .map(|zone| {
                Ok(Zone {
                    id: Self::str_field("zones.get", name, zone, "id")?.to_string(),
                    name: Self::str_field("zones.get", name, zone, "name")?.to_string(),
                })
            })
            .collect()
    }

    async fn list_records(
        &self,
        zone_id: &str,
        fqdn: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>> {
        tracing::debug!(fqdn, %record_type, "listing records");

        let url = format!(
            "{}/zones/{}/dns_records?name={}&type={}",
            CLOUDFLARE_API_BASE,
            zone_id,
            fqdn,
            record_type.as_str()
        );
        let json = self
            .send("dns_records.get", fqdn, self.client.get(&url))
            .await?;

        let records = json["result"].as_array().ok_or_else(|| {
            Error::provider(
                PROVIDER_NAME,
                "dns_records.get",
                fqdn,
                "invalid response format: result is not an array",
            )
        })?;

        records
            .iter()
            .map(|record| Self::parse_record("dns_records.get", fqdn, record))
            .collect()
    }

    async fn create_record(&self, zone_id: &str, spec: &RecordSpec) -> Result<DnsRecord> {
        let payload = Self::write_payload(spec);

        if self.dry_run {
            tracing::info!(
                fqdn = %spec.name,
                %payload,
                "[DRY-RUN] would POST dns_records"
            );
            return Ok(Self::dry_run_record(spec));
        }

        let url = format!("{}/zones/{}/dns_records", CLOUDFLARE_API_BASE, zone_id);
        let json = self
            .send(
                "dns_records.post",
                &spec.name,
                self.client.post(&url).json(&payload),
            )
            .await?;

        Self::parse_record("dns_records.post", &spec.name, &json["result"])
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        spec: &RecordSpec,
    ) -> Result<DnsRecord> {
        let payload = Self::write_payload(spec);

        if self.dry_run {
            tracing::info!(
                fqdn = %spec.name,
                record_id,
                %payload,
                "[DRY-RUN] would PUT dns_records"
            );
            return Ok(Self::dry_run_record(spec));
        }

        let url = format!(
            "{}/zones/{}/dns_records/{}",
            CLOUDFLARE_API_BASE, zone_id, record_id
        );
        let json = self
            .send(
                "dns_records.put",
                &spec.name,
                self.client.put(&url).json(&payload),
            )
            .await?;

        Self::parse_record("dns_records.put", &spec.name, &json["result"])
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "API token cannot be empty")]
    fn empty_token_panics() {
        CloudflareProvider::new("", false);
    }

    #[test]
    fn dry_run_mode() {
        let provider_dry = CloudflareProvider::new_dry_run("token");
        let provider_live = CloudflareProvider::new_live("token");

        assert!(provider_dry.dry_run, "dry-run provider should have dry_run=true");
        assert!(!provider_live.dry_run, "live provider should have dry_run=false");
    }

    #[test]
    fn api_token_not_exposed_in_debug() {
        let provider = CloudflareProvider::new("secret_token_12345", false);

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("CloudflareProvider"));
    }

    #[test]
    fn provider_name_is_cloudflare() {
        let provider = CloudflareProvider::new("token", false);
        assert_eq!(provider.provider_name(), "cloudflare");
    }

    #[test]
    fn write_payload_omits_proxied_on_create() {
        let spec = RecordSpec {
            name: "home.example.com".to_string(),
            record_type: RecordType::A,
            content: "203.0.113.5".to_string(),
            proxied: None,
        };

        let payload = CloudflareProvider::write_payload(&spec);
        assert_eq!(payload["name"], "home.example.com");
        assert_eq!(payload["type"], "A");
        assert_eq!(payload["content"], "203.0.113.5");
        assert!(payload.get("proxied").is_none());
    }

    #[test]
    fn write_payload_carries_preserved_proxied() {
        let spec = RecordSpec {
            name: "home.example.com".to_string(),
            record_type: RecordType::Aaaa,
            content: "2001:db8::1".to_string(),
            proxied: Some(true),
        };

        let payload = CloudflareProvider::write_payload(&spec);
        assert_eq!(payload["type"], "AAAA");
        assert_eq!(payload["proxied"], true);
    }

    #[test]
    fn parse_record_round_trip() {
        let value = serde_json::json!({
            "id": "372e67954025e0ba6aaa6d586b9e0b59",
            "name": "home.example.com",
            "type": "A",
            "content": "203.0.113.5",
            "proxied": true,
        });

        let record = CloudflareProvider::parse_record("dns_records.get", "home.example.com", &value)
            .expect("record parses");
        assert_eq!(record.id, "372e67954025e0ba6aaa6d586b9e0b59");
        assert_eq!(record.record_type, RecordType::A);
        assert_eq!(record.content, "203.0.113.5");
        assert!(record.proxied);
    }

    #[test]
    fn parse_record_rejects_unknown_type() {
        let value = serde_json::json!({
            "id": "abc",
            "name": "home.example.com",
            "type": "TXT",
            "content": "hello",
        });

        let result = CloudflareProvider::parse_record("dns_records.get", "home.example.com", &value);
        assert!(result.is_err());
    }
}
