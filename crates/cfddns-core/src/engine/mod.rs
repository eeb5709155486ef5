//! Poll-loop driver
//!
//! The PollDriver is responsible for:
//! - Resolving the current public IP on a fixed interval via IpResolver
//! - Skipping all provider interaction while the address is unchanged
//! - Locating the zone and reconciling the record when it changes
//! - Classifying errors: transient failures wait for the next interval,
//!   fatal ones terminate the run
//!
//! ## Cycle Flow
//!
//! ```text
//! ┌──────────────┐   resolve()   ┌──────────────┐
//! │  PollDriver  │──────────────▶│  IpResolver  │
//! └──────────────┘               └──────────────┘
//!        │ changed?
//!        ├─ no ──▶ sleep(interval)
//!        │
//!        ▼ yes
//! ┌──────────────┐  list_zones / list_records / put / post
//! │ locate_zone  │─────────────────────────────────────────▶ DnsProvider
//! │ + reconcile  │
//! └──────────────┘
//!        │
//!        ▼
//!  sleep(interval), repeat
//! ```

pub mod reconcile;

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ReconcileConfig;
use crate::error::{Result, Severity};
use crate::traits::{AddressFamily, DnsProvider, IpResolver};
use self::reconcile::ReconcileOutcome;

/// Capacity of the driver event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted by the PollDriver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// Driver started polling
    Started {
        domain: String,
        poll_interval_secs: u64,
    },

    /// A poll cycle resolved the current public IP
    IpResolved {
        address: String,
        family: AddressFamily,
    },

    /// The resolved IP matched the previous one; no provider calls made
    IpUnchanged { address: String },

    /// Reconciliation ran and applied its minimal action
    ReconcileApplied {
        fqdn: String,
        address: String,
        outcome: ReconcileOutcome,
    },

    /// A cycle failed with a transient error; the loop keeps running
    CycleFailed { error: String },

    /// Driver stopped
    Stopped { reason: String },
}

/// Per-domain reconciliation context.
///
/// Holds the only mutable state of the loop: the last address that was
/// handed to the provider. One context per managed domain; contexts are
/// independent, so a future multi-domain driver needs no shared state.
#[derive(Debug, Clone)]
pub struct DomainContext {
    /// The fully-qualified name being synchronized
    pub fqdn: String,
    /// The registrable root used for zone lookup
    pub zone_name: String,
    /// Last address applied (or attempted); `None` until the first change
    pub previous_ip: Option<String>,
    /// When the address last changed
    pub last_changed: Option<DateTime<Utc>>,
}

impl DomainContext {
    /// Create a context for a domain, deriving its zone name
    pub fn new(fqdn: impl Into<String>) -> Result<Self> {
        let fqdn = fqdn.into();
        let zone_name = crate::domain::registrable_root(&fqdn)?;
        Ok(Self {
            fqdn,
            zone_name,
            previous_ip: None,
            last_changed: None,
        })
    }
}

/// Fixed-interval poll driver
///
/// ## Lifecycle
///
/// 1. Create with [`PollDriver::new()`]
/// 2. Start with [`PollDriver::run()`]
/// 3. Runs until a fatal error or a termination signal
///
/// ## Error Policy
///
/// Leaf components return typed errors; the driver is the only place that
/// decides process fate. Transient failures (resolver hiccups, provider
/// 5xx, throttling) are logged and retried on the next interval. Fatal
/// failures (bad configuration, missing or ambiguous zone, rejected
/// credentials) end the run and are surfaced to the caller.
pub struct PollDriver {
    /// IP resolver for the current public address
    resolver: Box<dyn IpResolver>,

    /// DNS provider for zone and record operations
    provider: Box<dyn DnsProvider>,

    /// Immutable per-process configuration
    config: ReconcileConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<DriverEvent>,
}

impl PollDriver {
    /// Create a new poll driver
    ///
    /// # Returns
    ///
    /// A tuple of (driver, event_receiver) where event_receiver yields
    /// driver events
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
        config: ReconcileConfig,
    ) -> Result<(Self, mpsc::Receiver<DriverEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let driver = Self {
            resolver,
            provider,
            config,
            event_tx: tx,
        };

        Ok((driver, rx))
    }

    /// Run the poll loop until a fatal error or SIGINT
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Test-only entry point with a controlled shutdown signal
    ///
    /// **TESTING ONLY**: contract tests require deterministic shutdown.
    /// Production code should use [`PollDriver::run()`], which stops on
    /// OS signals.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        let mut ctx = DomainContext::new(self.config.domain.as_str())?;

        self.emit_event(DriverEvent::Started {
            domain: ctx.fqdn.clone(),
            poll_interval_secs: self.config.poll_interval_secs,
        });
        info!(
            domain = %ctx.fqdn,
            zone = %ctx.zone_name,
            interval_secs = self.config.poll_interval_secs,
            "poll driver started"
        );

        let mut shutdown: Pin<Box<dyn Future<Output = ()> + Send>> = match shutdown_rx {
            Some(rx) => Box::pin(async move {
                let _ = rx.await;
            }),
            None => Box::pin(async {
                let _ = tokio::signal::ctrl_c().await;
            }),
        };

        loop {
            tokio::select! {
                result = self.run_cycle(&mut ctx) => {
                    if let Err(e) = result {
                        match e.severity() {
                            Severity::Transient => {
                                error!("cycle failed, retrying next interval: {}", e);
                                self.emit_event(DriverEvent::CycleFailed {
                                    error: e.to_string(),
                                });
                            }
                            Severity::Fatal => {
                                error!("fatal error, stopping: {}", e);
                                self.emit_event(DriverEvent::Stopped {
                                    reason: "fatal error".to_string(),
                                });
                                return Err(e);
                            }
                        }
                    }
                }

                _ = &mut shutdown => {
                    info!("shutdown signal received");
                    self.emit_event(DriverEvent::Stopped {
                        reason: "shutdown signal".to_string(),
                    });
                    return Ok(());
                }
            }

            debug!(
                "sleeping for {} seconds",
                self.config.poll_interval_secs
            );
            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval()) => {}

                _ = &mut shutdown => {
                    info!("shutdown signal received");
                    self.emit_event(DriverEvent::Stopped {
                        reason: "shutdown signal".to_string(),
                    });
                    return Ok(());
                }
            }
        }
    }

    /// Run one poll cycle against the context
    async fn run_cycle(&self, ctx: &mut DomainContext) -> Result<()> {
        let resolved = self.resolver.resolve().await?;
        info!(
            domain = %ctx.fqdn,
            address = %resolved.address,
            record_type = %resolved.record_type(),
            "current IP address"
        );
        self.emit_event(DriverEvent::IpResolved {
            address: resolved.address.clone(),
            family: resolved.family,
        });

        if ctx.previous_ip.as_deref() == Some(resolved.address.as_str()) {
            info!(domain = %ctx.fqdn, "IP address is the same, skipping update");
            self.emit_event(DriverEvent::IpUnchanged {
                address: resolved.address,
            });
            return Ok(());
        }

        // Record the new address before touching the provider, so a failed
        // update is not re-attempted every cycle until the address moves
        // again. A restart still forces one fresh attempt: this state is
        // in-memory only.
        ctx.previous_ip = Some(resolved.address.clone());
        ctx.last_changed = Some(Utc::now());

        let zone = reconcile::locate_zone(self.provider.as_ref(), &ctx.zone_name).await?;
        let outcome =
            reconcile::reconcile(self.provider.as_ref(), &zone.id, &ctx.fqdn, &resolved).await?;

        info!(
            domain = %ctx.fqdn,
            address = %resolved.address,
            %outcome,
            "reconcile complete"
        );
        self.emit_event(DriverEvent::ReconcileApplied {
            fqdn: ctx.fqdn.clone(),
            address: resolved.address,
            outcome,
        });

        Ok(())
    }

    /// Emit a driver event
    fn emit_event(&self, event: DriverEvent) {
        // Send event, dropping it with a warning if the channel is full:
        // observation must never block or grow the loop's memory.
        if self.event_tx.try_send(event).is_err() {
            warn!("event channel full, dropping event");
        }
    }
}
