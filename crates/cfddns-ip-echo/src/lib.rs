// # Echo-endpoint IP Resolver
//
// This crate provides the HTTP-based IpResolver implementation for cfddns.
//
// ## Architecture
//
// One GET per poll cycle against a plaintext IP-echo service. The body is
// trimmed and classified by the colon rule; an empty body is an error.
// There is no retry here: the poll loop's next interval is the retry, and
// failures are reported as transient so the driver keeps running.
//
// Alternative echo services, should the default misbehave:
// - https://api.ipify.org
// - https://ifconfig.me/ip
// - https://icanhazip.com

use std::time::Duration;

use async_trait::async_trait;
use cfddns_core::traits::{IpResolver, ResolvedIp};
use cfddns_core::{Error, Result};

/// Default IP-echo endpoint
const ECHO_ENDPOINT: &str = "https://ifconfig.co";

/// User-agent sent to the echo endpoint. Some echo services sniff the
/// agent and return HTML to browsers; a curl agent gets the plain body.
const ECHO_USER_AGENT: &str = "curl/7.72.0";

/// Timeout for the echo request
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP echo-endpoint IP resolver
pub struct EchoIpResolver {
    /// URL of the echo endpoint
    url: String,

    /// HTTP client for echo requests
    client: reqwest::Client,
}

impl EchoIpResolver {
    /// Create a resolver against the default echo endpoint
    pub fn new() -> Self {
        Self::with_endpoint(ECHO_ENDPOINT)
    }

    /// Create a resolver against a specific echo endpoint
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(ECHO_USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            url: url.into(),
            client,
        }
    }
}

impl Default for EchoIpResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpResolver for EchoIpResolver {
    async fn resolve(&self) -> Result<ResolvedIp> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_resolver(format!("{}: request failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_resolver(format!(
                "{}: unexpected status {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_resolver(format!("{}: failed to read body: {}", self.url, e)))?;

        let address = body.trim();
        if address.is_empty() {
            return Err(Error::ip_resolver(format!("{}: empty body", self.url)));
        }

        let resolved = ResolvedIp::new(address);
        tracing::debug!(
            address = %resolved.address,
            record_type = %resolved.record_type(),
            "public IP resolved"
        );
        Ok(resolved)
    }
}
