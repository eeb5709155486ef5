//! Privilege downgrade
//!
//! Configuration may live in a root-only directory, so the daemon starts
//! privileged, reads it, and then drops to an unprivileged identity before
//! any network I/O happens. The downgrade runs once, before the tokio
//! runtime is built.

use anyhow::Result;

/// Target uid for the downgrade ("nobody")
#[cfg(unix)]
const UNPRIVILEGED_UID: libc::uid_t = 65534;

/// Drop root privileges if the process has them.
///
/// A non-root process keeps its identity; failing to shed root is an
/// error, since continuing privileged would defeat the point.
#[cfg(unix)]
pub fn drop_privileges() -> Result<()> {
    // SAFETY: geteuid never fails and has no preconditions
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        tracing::debug!(euid, "not running as root, skipping privilege downgrade");
        return Ok(());
    }

    // SAFETY: plain setuid call; no threads have been spawned yet
    let rc = unsafe { libc::setuid(UNPRIVILEGED_UID) };
    if rc != 0 {
        anyhow::bail!(
            "setuid({}) failed: {}",
            UNPRIVILEGED_UID,
            std::io::Error::last_os_error()
        );
    }

    tracing::info!(uid = UNPRIVILEGED_UID, "privileges downgraded");
    Ok(())
}

/// No-op on platforms without Unix uids.
#[cfg(not(unix))]
pub fn drop_privileges() -> Result<()> {
    tracing::debug!("privilege downgrade not supported on this platform");
    Ok(())
}
