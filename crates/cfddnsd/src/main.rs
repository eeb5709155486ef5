// # cfddnsd - DNS synchronization daemon
//
// Keeps one domain's A/AAAA record at Cloudflare pointed at the host's
// current public IP. This binary is a thin integration layer:
//
// 1. Parse the CLI (one required domain argument)
// 2. Load the per-domain YAML configuration
// 3. Downgrade privileges
// 4. Build the resolver and provider, then hand off to the core PollDriver
//
// All reconciliation logic lives in cfddns-core; all provider specifics in
// cfddns-provider-cloudflare.
//
// ## Example
//
// ```bash
// # /etc/cfddns/example.com.yaml:
// #   token: "cloudflare-api-token"
// #   frequency: 300
//
// cfddnsd --domain home.example.com
// ```

mod config;
mod privilege;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use cfddns_core::traits::ConfigProvider;
use cfddns_core::{PollDriver, ReconcileConfig};
use cfddns_ip_echo::EchoIpResolver;
use cfddns_provider_cloudflare::CloudflareProvider;

use config::FileConfigProvider;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (fatal reconciliation failure)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (fatal failure inside the loop)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "cfddnsd", version, about = "Synchronize a DNS record with the current public IP")]
struct Cli {
    /// Domain name to synchronize
    #[arg(short, long)]
    domain: String,

    /// Directory searched for per-domain configuration files
    #[arg(long, default_value = "/etc/cfddns")]
    config_dir: PathBuf,

    /// Perform lookups but log writes instead of applying them
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = validate_domain_name(&cli.domain) {
        eprintln!("Invalid domain '{}': {}", cli.domain, e);
        return DaemonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!(
                "Invalid log level '{}'. Valid levels: trace, debug, info, warn, error",
                other
            );
            return DaemonExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting cfddnsd");

    // Load configuration before touching anything else: it may require
    // privileges we are about to give up.
    let config_provider = FileConfigProvider::new(&cli.config_dir);
    let config = match (&config_provider as &dyn ConfigProvider).load(&cli.domain) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };
    info!(domain = %config.domain, interval_secs = config.poll_interval_secs, "configuration loaded");

    // After reading the config, downgrade this process's privileges
    if let Err(e) = privilege::drop_privileges() {
        error!("Privilege downgrade failed: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(config, cli.dry_run).await {
            error!("Daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    })
    .into()
}

/// Build the components and run the poll loop until a fatal error or signal
async fn run_daemon(config: ReconcileConfig, dry_run: bool) -> Result<()> {
    let resolver = Box::new(EchoIpResolver::new());

    if dry_run {
        warn!("dry-run mode: no DNS changes will be made");
    }
    let provider = Box::new(CloudflareProvider::new(config.token.clone(), dry_run));

    let (driver, mut event_rx) = PollDriver::new(resolver, provider, config)?;

    // Surface driver events in the logs; the driver itself never blocks
    // on this channel.
    let event_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            tracing::debug!(?event, "driver event");
        }
    });

    let result = driver.run().await;
    event_task.abort();

    result?;
    info!("Shutting down");
    Ok(())
}

/// Validate that a string is a plausible DNS domain name
///
/// This implements basic domain name validation per RFC 1035. It's not
/// comprehensive but catches common errors before config lookup runs.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("domain name cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!("domain name too long: {} chars (max 253)", domain.len());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        anyhow::bail!("expected a fully-qualified name with at least two labels");
    }

    for label in labels {
        if label.is_empty() {
            anyhow::bail!("domain name has an empty label");
        }

        if label.len() > 63 {
            anyhow::bail!("label '{}' too long: {} chars (max 63)", label, label.len());
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "label '{}' contains invalid characters (alphanumeric and hyphen only)",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!("label '{}' cannot start or end with a hyphen", label);
        }
    }

    Ok(())
}
